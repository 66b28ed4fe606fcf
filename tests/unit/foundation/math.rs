use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"kickshot");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b'k');
    b.write_bytes(b"ickshot");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_distinguishes_signed_zero() {
    let mut a = Fnv1a64::new_default();
    a.write_f64(0.0);
    let mut b = Fnv1a64::new_default();
    b.write_f64(-0.0);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(3.0, 7.0, 0.0), 3.0);
    assert_eq!(lerp(3.0, 7.0, 1.0), 7.0);
    assert_eq!(lerp(3.0, 7.0, 0.5), 5.0);
}
