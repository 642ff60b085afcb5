//! Common Type Tests.
//!
//! Verifies the block-address arithmetic, the IP-tag hash, and the rendering
//! of the typed configuration and trace errors.

use bertisim_core::common::{ConfigError, LineAddr, ip_tag};

// ══════════════════════════════════════════════════════════
// 1. Block addresses
// ══════════════════════════════════════════════════════════

/// Positive and negative deltas move the block number as signed arithmetic.
#[test]
fn line_addr_signed_offsets() {
    let base = LineAddr::new(0x2000);
    assert_eq!(base.offset(16).val(), 0x2010);
    assert_eq!(base.offset(-32).val(), 0x1FE0);
}

/// Offsets wrap rather than panic at the address-space edge.
#[test]
fn line_addr_offset_wraps() {
    let top = LineAddr::new(u64::MAX);
    assert_eq!(top.offset(1).val(), 0);
    assert_eq!(LineAddr::new(0).offset(-1).val(), u64::MAX);
}

/// Masking keeps only the configured low bits.
#[test]
fn line_addr_masking() {
    let addr = LineAddr::new(0xABCD_1234);
    assert_eq!(addr.masked(0xFF_FFFF), 0xCD_1234);
}

// ══════════════════════════════════════════════════════════
// 2. Tag hashing
// ══════════════════════════════════════════════════════════

/// The hash folds bits 1 and 4 before masking.
#[test]
fn ip_tag_matches_documented_hash() {
    let ip = 0x400;
    assert_eq!(ip_tag(ip, 0x3FF), ((ip >> 1) ^ (ip >> 4)) & 0x3FF);
    assert_eq!(ip_tag(0x400, 0x3FF), 0x240);
}

/// The tag never exceeds the mask, for any IP.
#[test]
fn ip_tag_respects_mask() {
    for ip in [0u64, 1, 0xDEAD_BEEF, u64::MAX] {
        assert!(ip_tag(ip, 0x3FF) <= 0x3FF, "tag escaped mask for ip {ip:#x}");
    }
}

/// Nearby IPs (e.g. consecutive instructions) usually land on distinct tags.
#[test]
fn ip_tag_separates_nearby_ips() {
    let a = ip_tag(0x1000, 0x3FF);
    let b = ip_tag(0x1004, 0x3FF);
    assert_ne!(a, b, "adjacent instructions should not collide trivially");
}

// ══════════════════════════════════════════════════════════
// 3. Error rendering
// ══════════════════════════════════════════════════════════

/// Config errors name the offending field and value.
#[test]
fn config_error_names_field() {
    let err = ConfigError::NotPowerOfTwo {
        name: "engine.history_sets",
        value: 12,
    };
    let text = err.to_string();
    assert!(text.contains("engine.history_sets"), "got: {text}");
    assert!(text.contains("12"), "got: {text}");
}

/// Mask errors print the rejected mask in hex.
#[test]
fn config_error_mask_is_hex() {
    let err = ConfigError::BadMask {
        name: "engine.cycle_mask",
        value: 0xF0F0,
    };
    assert!(err.to_string().contains("0xf0f0"), "got: {err}");
}
