//! Metrics for the standard Helvetica fonts.
//!
//! Widths come from the Adobe AFM files for the base-14 fonts, in 1/1000 em,
//! indexed by WinAnsi code point: one table for 32..=126 and one for the
//! Latin-1 range 0xA0..=0xFF. Used to anchor centered and right-aligned
//! text without embedding a font.

use crate::layout::FontWeight;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    // nbsp ¡ ¢ £ ¤ ¥ ¦ § ¨ © ª « ¬ shy ® ¯
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // ° ± ² ³ ´ µ ¶ · ¸ ¹ º » ¼ ½ ¾ ¿
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À-Ï
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð-ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à-ï
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð-ÿ
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// PDF base font name for a weight.
pub fn base_font(weight: FontWeight) -> &'static str {
    match weight {
        FontWeight::Normal => "Helvetica",
        FontWeight::Bold => "Helvetica-Bold",
    }
}

/// Width of `text` at `font_size` points, in points.
///
/// Measures the bytes [`encode_win_ansi`] produces, so unencodable
/// characters count as `?`.
pub fn text_width_pt(text: &str, weight: FontWeight, font_size: f32) -> f32 {
    let (ascii, latin1) = match weight {
        FontWeight::Normal => (&HELVETICA, &HELVETICA_LATIN1),
        FontWeight::Bold => (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1),
    };
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|byte| match byte {
            0x20..=0x7e => ascii[(byte - 0x20) as usize] as u32,
            _ => latin1[(byte - 0xa0) as usize] as u32,
        })
        .sum();
    units as f32 * font_size / 1000.0
}

/// Encode text for a WinAnsi-encoded base font.
///
/// ASCII and Latin-1 map directly; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // "Hi" = H(722) + i(222) at 10pt
        assert!((text_width_pt("Hi", FontWeight::Normal, 10.0) - 9.44).abs() < 1e-4);
        // bold i is wider
        assert!(
            text_width_pt("i", FontWeight::Bold, 10.0) > text_width_pt("i", FontWeight::Normal, 10.0)
        );
        assert_eq!(text_width_pt("", FontWeight::Normal, 12.0), 0.0);
    }

    #[test]
    fn test_table_anchors() {
        assert_eq!(HELVETICA[(b'A' - 32) as usize], 667);
        assert_eq!(HELVETICA[(b'z' - 32) as usize], 500);
        assert_eq!(HELVETICA_BOLD[(b'm' - 32) as usize], 889);
        assert_eq!(HELVETICA_BOLD[(b'~' - 32) as usize], 584);
    }

    #[test]
    fn test_latin1_widths() {
        let width = |text, weight| text_width_pt(text, weight, 10.0);
        assert_eq!(width("é", FontWeight::Normal), width("e", FontWeight::Normal));
        assert_eq!(width("Ñ", FontWeight::Normal), width("N", FontWeight::Normal));
        assert!((width("Ö", FontWeight::Bold) - 7.78).abs() < 1e-4);
        assert!((width("Æ", FontWeight::Normal) - 10.0).abs() < 1e-4);
        assert_eq!(HELVETICA_LATIN1[0xff - 0xa0], 500);
        assert_eq!(HELVETICA_BOLD_LATIN1[0xe7 - 0xa0], 556);
    }

    #[test]
    fn test_unencodable_measured_as_question_mark() {
        assert_eq!(
            text_width_pt("東", FontWeight::Bold, 10.0),
            text_width_pt("?", FontWeight::Bold, 10.0)
        );
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(encode_win_ansi("Zoë"), vec![b'Z', b'o', 0xeb]);
        assert_eq!(encode_win_ansi("東京"), b"??".to_vec());
    }
}
