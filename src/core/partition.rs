//! Splitting a file buffer at import statement boundaries.

use std::ops::Range;

use super::module::{Segment, SegmentKind};

/// Split `buffer` into text and import segments.
///
/// `ranges` are the byte ranges of the file's import statements. They are
/// sorted and deduplicated here; text between them becomes [`SegmentKind::Text`]
/// segments, empty slices are omitted. The concatenation of the returned
/// segments is always `buffer`.
pub fn partition(buffer: &str, ranges: &[Range<usize>]) -> Vec<Segment> {
    let mut cuts: Vec<Range<usize>> = ranges
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| r.start.min(buffer.len())..r.end.min(buffer.len()))
        .collect();
    cuts.sort_by_key(|r| (r.start, r.end));
    cuts.dedup();

    let mut segments = Vec::with_capacity(cuts.len() * 2 + 1);
    let mut cursor = 0;
    for cut in cuts {
        // An overlapping range only contributes the part past the cursor.
        let start = cut.start.max(cursor);
        if cut.end <= start {
            continue;
        }
        push(&mut segments, buffer, SegmentKind::Text, cursor..start);
        push(&mut segments, buffer, SegmentKind::Import, start..cut.end);
        cursor = cut.end;
    }
    push(&mut segments, buffer, SegmentKind::Text, cursor..buffer.len());
    segments
}

fn push(segments: &mut Vec<Segment>, buffer: &str, kind: SegmentKind, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    segments.push(Segment {
        kind,
        text: buffer[range.clone()].to_string(),
        range,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn concat(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn kinds(segments: &[Segment]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_no_imports_is_one_text_segment() {
        let buffer = "const a = 1;\n";
        let segments = partition(buffer, &[]);
        assert_eq!(kinds(&segments), vec![SegmentKind::Text]);
        assert_eq!(concat(&segments), buffer);
    }

    #[test]
    fn test_empty_buffer() {
        assert!(partition("", &[]).is_empty());
    }

    #[test]
    fn test_imports_split_the_buffer() {
        let buffer = "import a from 'a';\nimport b from 'b';\nrun(a, b);\n";
        let segments = partition(buffer, &[19..37, 0..18]);
        assert_eq!(
            kinds(&segments),
            vec![
                SegmentKind::Import,
                SegmentKind::Text,
                SegmentKind::Import,
                SegmentKind::Text,
            ]
        );
        assert_eq!(segments[0].text, "import a from 'a';");
        assert_eq!(segments[1].text, "\n");
        assert_eq!(segments[2].text, "import b from 'b';");
        assert_eq!(segments[3].range, 37..buffer.len());
        assert_eq!(concat(&segments), buffer);
    }

    #[test]
    fn test_import_at_end_has_no_trailing_text() {
        let buffer = "x();\nimport a from 'a';";
        let segments = partition(buffer, &[5..buffer.len()]);
        assert_eq!(kinds(&segments), vec![SegmentKind::Text, SegmentKind::Import]);
        assert_eq!(concat(&segments), buffer);
    }

    #[test]
    fn test_duplicate_ranges_are_merged() {
        let buffer = "import a from 'a';rest";
        let segments = partition(buffer, &[0..18, 0..18]);
        assert_eq!(segments.len(), 2);
        assert_eq!(concat(&segments), buffer);
    }

    #[test]
    fn test_round_trip_for_many_imports() {
        for count in 0..6 {
            let mut buffer = String::from("// header\n");
            let mut ranges = Vec::new();
            for i in 0..count {
                let stmt = format!("import m{i} from './m{i}.js';");
                ranges.push(buffer.len()..buffer.len() + stmt.len());
                buffer.push_str(&stmt);
                buffer.push_str(&format!("\nuse(m{i});\n"));
            }
            let segments = partition(&buffer, &ranges);
            assert_eq!(concat(&segments), buffer);
            let imports = segments.iter().filter(|s| s.kind == SegmentKind::Import).count();
            assert_eq!(imports, count);
            assert!(segments.windows(2).all(|w| w[0].range.end == w[1].range.start));
        }
    }
}
