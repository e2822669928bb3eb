use ratatui::{style::Style, text::Line};
use unicode_width::UnicodeWidthStr;

pub const HEART: [&str; 5] = [
    " ██▄ ▄██ ",
    "█████████",
    " ▀█████▀ ",
    "   ▀█▀   ",
    "         ",
];

pub const HEART_BEAT: [&str; 5] = [
    " ▄███▄ ▄███▄ ",
    "█████████████",
    " ▀█████████▀ ",
    "   ▀█████▀   ",
    "     ▀█▀     ",
];

pub const RESCUER_READY: [&str; 4] = [
    "   (o_o)   ",
    "   /| |\\   ",
    "    |_|    ",
    "  ~~~~~~~  ",
];

pub const RESCUER_PRESSING: [&str; 4] = [
    "           ",
    "   (>_<)   ",
    "   \\|_|/   ",
    "  ~~vvv~~  ",
];

pub const PATIENT: [&str; 1] = ["(-_-)=======[]"];

pub const CHECK_RESPONSE: [&str; 3] = ["  ?  ?  ", " (o_o)/ ", "  \"Are you OK?\""];

pub const CALL_FOR_HELP: [&str; 3] = [" .----. ", " | 911| ", " '----' "];

/// Pads every row to the widest one so centered rows stay aligned.
pub fn art_lines(rows: &[&str], style: Style) -> Vec<Line<'static>> {
    let width = rows.iter().map(|r| r.width()).max().unwrap_or(0);
    rows.iter()
        .map(|r| {
            let pad = width - r.width();
            Line::styled(format!("{}{}", r, " ".repeat(pad)), style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_equal_width() {
        let lines = art_lines(&CHECK_RESPONSE, Style::default());
        let widths: Vec<usize> = lines.iter().map(|l| l.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn both_rescuer_frames_have_the_same_height() {
        assert_eq!(RESCUER_READY.len(), RESCUER_PRESSING.len());
        assert_eq!(HEART.len(), HEART_BEAT.len());
    }
}
