//! Keep a scroll offset consistent with a cursor and a window height.

/// Return the scroll offset that keeps `cursor` inside a window of
/// `visible_height` rows over a list of `list_len` rows.
///
/// Scrolls up to meet a cursor above the window, or down just far enough to
/// put it on the last visible row, then clamps to
/// `[0, max(0, list_len - visible_height)]`.
#[must_use]
pub const fn ensure_visible(
    cursor: usize,
    scroll: usize,
    list_len: usize,
    visible_height: usize,
) -> usize {
    let height = if visible_height == 0 { 1 } else { visible_height };

    let mut next = scroll;
    if cursor < next {
        next = cursor;
    } else if cursor >= next + height {
        next = cursor + 1 - height;
    }

    let max_scroll = list_len.saturating_sub(height);
    if next > max_scroll { max_scroll } else { next }
}

/// Clamp a cursor into `[0, list_len)`, or `0` for an empty list.
#[must_use]
pub const fn clamp_cursor(cursor: usize, list_len: usize) -> usize {
    if list_len == 0 {
        0
    } else if cursor >= list_len {
        list_len - 1
    } else {
        cursor
    }
}
