#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("₹₹₹₹₹₹", 4), "₹₹₹…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_rupee() {
    assert_eq!(format_amount(dec!(1234.56), "₹"), "₹1,234.56");
}

#[test]
fn test_format_amount_dollar() {
    assert_eq!(format_amount(dec!(999.99), "$"), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0), "₹"), "₹0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-50), "₹"), "-₹50.00");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89), "$"), "$1,234,567.89");
}

#[test]
fn test_format_amount_pads_decimals() {
    assert_eq!(format_amount(dec!(12.5), "$"), "$12.50");
}

#[test]
fn test_format_amount_empty_symbol() {
    assert_eq!(format_amount(dec!(7), ""), "7.00");
}

// ── format_size ───────────────────────────────────────────────

#[test]
fn test_format_size() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(2048), "2.0 KB");
    assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (9, 7);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (9, 7));
}

#[test]
fn test_scroll_up_moves_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
}

#[test]
fn test_scroll_to_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
}

#[test]
fn test_clamp_cursor_after_delete() {
    let (mut index, mut scroll) = (4, 4);
    clamp_cursor(&mut index, &mut scroll, 4);
    assert_eq!((index, scroll), (3, 3));

    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
