//! CSV exporter: `Index,Start (s),End (s),Segment`, one row per sentence.

use crate::segmenter::Sentence;
use std::io::Write;
use std::path::Path;

pub fn write(path: &Path, sentences: &[Sentence]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "Index,Start (s),End (s),Segment")?;
    for (i, s) in sentences.iter().enumerate() {
        writeln!(file, "{},{:.2},{:.2},{}", i + 1, s.start_s, s.end_s, escape(&s.text))?;
    }
    Ok(())
}

fn escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_one_row_per_sentence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sentences = vec![Sentence { start_s: 0.0, end_s: 1.5, text: "Hello, world".into(), speaker: None }];
        write(&path, &sentences).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Index,Start (s),End (s),Segment"));
        assert_eq!(lines.next(), Some("1,0.00,1.50,\"Hello, world\""));
    }
}
