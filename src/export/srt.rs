//! SRT exporter: blank-line-separated `<n>\n<start> --> <end>\n<text>` blocks.

use crate::segmenter::Sentence;
use std::io::Write;
use std::path::Path;

pub fn write(path: &Path, sentences: &[Sentence]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for (i, s) in sentences.iter().enumerate() {
        writeln!(file, "{}", i + 1)?;
        writeln!(file, "{} --> {}", timestamp(s.start_s), timestamp(s.end_s))?;
        writeln!(file, "{}", s.text)?;
        writeln!(file)?;
    }
    Ok(())
}

fn timestamp(seconds: f32) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn formats_timestamps_with_comma_millis() {
        assert_eq!(timestamp(3661.5), "01:01:01,500");
        assert_eq!(timestamp(0.0), "00:00:00,000");
    }

    #[test]
    fn writes_blank_line_separated_blocks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let sentences = vec![
            Sentence { start_s: 0.0, end_s: 1.0, text: "First".into(), speaker: None },
            Sentence { start_s: 1.0, end_s: 2.0, text: "Second".into(), speaker: None },
        ];
        write(&path, &sentences).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let expected = "1\n00:00:00,000 --> 00:00:01,000\nFirst\n\n2\n00:00:01,000 --> 00:00:02,000\nSecond\n\n";
        assert_eq!(contents, expected);
    }
}
