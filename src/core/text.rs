// Fixed-width text helpers for the character display

/// Center `text` within `width` columns, padding with spaces on both sides.
///
/// Text longer than the display is truncated to fit. When the padding is
/// uneven the extra space goes on the right.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let pad = (width - len) / 2;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(' ').take(pad));
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(width - len - pad));
    out
}
