//! HDF5 metadata checksum: Bob Jenkins' lookup3 `hashlittle`.
//!
//! Superblocks v2/v3 and v2 object headers end in a 4-byte little-endian
//! lookup3 hash of everything before it.

/// Compute the lookup3 checksum HDF5 stores after metadata blocks.
pub fn jenkins_lookup3(data: &[u8]) -> u32 {
    hashlittle(data, 0)
}

/// Check that the last four bytes of `block` are the lookup3 hash of the rest.
///
/// Returns `(stored, computed)` on mismatch.
pub fn verify_trailing(block: &[u8]) -> Result<(), (u32, u32)> {
    if block.len() < 4 {
        return Err((0, jenkins_lookup3(block)));
    }
    let split = block.len() - 4;
    let stored = u32::from_le_bytes([
        block[split],
        block[split + 1],
        block[split + 2],
        block[split + 3],
    ]);
    let computed = jenkins_lookup3(&block[..split]);
    if stored == computed {
        Ok(())
    } else {
        Err((stored, computed))
    }
}

fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

fn final_mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

fn word(block: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([block[i], block[i + 1], block[i + 2], block[i + 3]])
}

fn hashlittle(data: &[u8], initval: u32) -> u32 {
    let seed = 0xdead_beefu32
        .wrapping_add(data.len() as u32)
        .wrapping_add(initval);
    let (mut a, mut b, mut c) = (seed, seed, seed);

    let mut rest = data;
    while rest.len() > 12 {
        a = a.wrapping_add(word(rest, 0));
        b = b.wrapping_add(word(rest, 4));
        c = c.wrapping_add(word(rest, 8));
        mix(&mut a, &mut b, &mut c);
        rest = &rest[12..];
    }

    if rest.is_empty() {
        return c;
    }

    // The final 1..=12 bytes are added as little-endian words with the
    // missing high bytes treated as zero.
    let mut tail = [0u8; 12];
    tail[..rest.len()].copy_from_slice(rest);
    a = a.wrapping_add(word(&tail, 0));
    b = b.wrapping_add(word(&tail, 4));
    c = c.wrapping_add(word(&tail, 8));
    final_mix(&mut a, &mut b, &mut c);
    c
}
