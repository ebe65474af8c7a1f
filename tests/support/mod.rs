//! Assembles a valid binary artifact from plain Rust data, standing in for
//! the out-of-scope offline builder so integration tests can exercise
//! [`json_match_index::Reader`] without shipping compacted fixture files.

use roaring::RoaringBitmap;

/// Builds one artifact. `entries` must already be in dictionary (sorted,
/// byte-lexicographic) order. Callers are acting as the builder here, so
/// getting this wrong is a test bug, not something the reader should have
/// to tolerate.
pub fn build_artifact(entries: &[(&str, &[u32])], flat_to_src: &[u32]) -> Vec<u8> {
    let width = entries.iter().map(|(t, _)| t.len()).max().unwrap_or(0) as u32;

    let mut dict_bytes = Vec::new();
    for (token, _) in entries {
        dict_bytes.extend_from_slice(token.as_bytes());
        dict_bytes.resize(dict_bytes.len() + (width as usize - token.len()), 0);
    }

    let mut data = Vec::new();
    let mut offsets = vec![0u64];
    for (_, ids) in entries {
        let bitmap = RoaringBitmap::from_sorted_iter(ids.iter().copied()).unwrap();
        bitmap.serialize_into(&mut data).unwrap();
        offsets.push(data.len() as u64);
    }
    let mut posting_bytes = Vec::new();
    for o in offsets {
        posting_bytes.extend_from_slice(&o.to_be_bytes());
    }
    posting_bytes.extend_from_slice(&data);

    let mut mapping_bytes = Vec::new();
    for id in flat_to_src {
        mapping_bytes.extend_from_slice(&id.to_le_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(&1u32.to_be_bytes()); // version
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&(dict_bytes.len() as u64).to_be_bytes());
    out.extend_from_slice(&(posting_bytes.len() as u64).to_be_bytes());
    out.extend_from_slice(&(mapping_bytes.len() as u64).to_be_bytes());
    out.extend_from_slice(&dict_bytes);
    out.extend_from_slice(&posting_bytes);
    out.extend_from_slice(&mapping_bytes);
    out
}

/// A small worked example:
/// ```text
/// src 0: {"user":{"city":"NYC"}, "tags":["x","y"]}
/// src 1: {"user":{"city":"LA"},  "tags":["y"]}
/// src 2: {"user":{"city":"NYC"}}
/// flatToSrc = [0,0,0,0,0, 1,1,1, 2,2]
/// ```
/// A source doc's scalar fields (like `user.city`) and its "does this key
/// exist at all" bare tokens are carried by one *primary* flattened id per
/// doc, shared across every array-element id that doc also contributes.
/// That sharing is what makes `AND(EQ(user.city, "NYC"), IS_NOT_NULL(tags))`
/// land on the right source doc instead of two disjoint, never-intersecting
/// bitmaps. Each array element gets its own flattened id carrying that
/// element's `$index=N` constraint token and its key-value token. A doc
/// can also contribute unused filler ids; `flatToSrc` only requires them
/// to map back to the right source, not to appear in any posting list.
///
/// ```text
/// flat 0: src 0 primary   -> user.city (bare), user.city\0NYC, tags (bare)
/// flat 1: src 0 tags[0]   -> tags.$index=0, tags\0x
/// flat 2: src 0 tags[1]   -> tags.$index=1, tags\0y
/// flat 3: src 0 filler    -> (unused)
/// flat 4: src 0 filler    -> (unused)
/// flat 5: src 1 primary   -> user.city (bare), user.city\0LA, tags (bare)
/// flat 6: src 1 tags[0]   -> tags.$index=0, tags\0y
/// flat 7: src 1 filler    -> (unused)
/// flat 8: src 2 primary   -> user.city (bare), user.city\0NYC
/// flat 9: src 2 filler    -> (unused)
/// ```
///
/// Src 2 has no `tags` field at all, so it contributes no id to the
/// `tags` bare-key token or to any `tags.*`/`tags\0*` token. That absence
/// is exactly what makes `IS_NOT_NULL(tags)` exclude it.
pub fn sample_city_tags_artifact() -> Vec<u8> {
    let entries: &[(&str, &[u32])] = &[
        ("tags", &[0, 5][..]),
        ("tags\0x", &[1][..]),
        ("tags\0y", &[2, 6][..]),
        ("tags.$index=0", &[1, 6][..]),
        ("tags.$index=1", &[2][..]),
        ("user.city", &[0, 5, 8][..]),
        ("user.city\0LA", &[5][..]),
        ("user.city\0NYC", &[0, 8][..]),
    ];
    // flatToSrc: flattened ids 0..10 -> source ids, per the layout above.
    let flat_to_src = [0, 0, 0, 0, 0, 1, 1, 1, 2, 2];
    build_artifact(entries, &flat_to_src)
}
