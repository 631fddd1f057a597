//! Rebuilds visual text lines from a page's content stream.
//!
//! Statement tables are usually drawn one text object per cell, so the
//! stream order says nothing about rows. Each shown string is placed at
//! its text-space origin (text matrix times CTM); runs sharing a baseline
//! form one line, ordered left to right, with a space wherever the gap to
//! the previous run is wider than a fraction of the font size.
//!
//! Glyph widths are not read from the font. A run's width is estimated at
//! half an em per character, which is only used to decide on spaces.
//! String bytes are decoded as single-byte text; composite (Type0) fonts
//! are not mapped through their CMaps.

use lopdf::Object;
use lopdf::content::Operation;

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Estimated glyph advance, in ems
const GLYPH_WIDTH_EM: f32 = 0.5;
/// Gap, in ems, above which neighbouring runs are separated by a space
const SPACE_GAP_EM: f32 = 0.2;
/// Baseline distance, in ems, within which runs share a line
const LINE_TOLERANCE_EM: f32 = 0.4;
/// TJ displacement (thousandths of an em) treated as a word break
const TJ_SPACE_THRESHOLD: f32 = -250.0;

fn mul(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

fn translate(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

fn floats(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(|o| o.as_float().ok()).collect()
}

fn decode(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes
        .iter()
        .map(|&b| if b.is_ascii_control() { ' ' } else { b as char })
        .collect()
}

/// A string drawn at one position
#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    x: f32,
    y: f32,
    /// Effective font size in device space
    size: f32,
    text: String,
}

impl TextRun {
    fn end_x(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.size * GLYPH_WIDTH_EM
    }
}

#[derive(Default)]
struct TextState {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font_size: f32,
    leading: f32,
    runs: Vec<TextRun>,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            tm: IDENTITY,
            tlm: IDENTITY,
            font_size: 1.0,
            ..Default::default()
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = mul(&translate(tx, ty), &self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, text: String, advance_ems: f32) {
        let trm = mul(&self.tm, &self.ctm);
        let scale = (trm[2] * trm[2] + trm[3] * trm[3]).sqrt();
        let size = if scale > 0.0 { self.font_size * scale } else { self.font_size };

        let advance = advance_ems * self.font_size;
        self.tm = mul(&translate(advance, 0.0), &self.tm);

        if text.trim().is_empty() {
            return;
        }
        self.runs.push(TextRun {
            x: trm[4],
            y: trm[5],
            size: size.abs().max(f32::EPSILON),
            text,
        });
    }

    fn show_string(&mut self, operand: Option<&Object>) {
        if let Some(Object::String(bytes, _)) = operand {
            let text = decode(bytes);
            let ems = text.chars().count() as f32 * GLYPH_WIDTH_EM;
            self.show(text, ems);
        }
    }

    fn show_array(&mut self, operand: Option<&Object>) {
        let Some(Object::Array(items)) = operand else { return };

        let mut text = String::new();
        let mut ems = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let s = decode(bytes);
                    ems += s.chars().count() as f32 * GLYPH_WIDTH_EM;
                    text.push_str(&s);
                }
                other => {
                    if let Ok(n) = other.as_float() {
                        if n <= TJ_SPACE_THRESHOLD && !text.ends_with(' ') {
                            text.push(' ');
                        }
                        ems -= n / 1000.0;
                    }
                }
            }
        }
        self.show(text, ems);
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(m) = self.ctm_stack.pop() {
                    self.ctm = m;
                }
            }
            "cm" => {
                if let [a, b, c, d, e, f] = floats(operands)[..] {
                    self.ctm = mul(&[a, b, c, d, e, f], &self.ctm);
                }
            }
            "BT" => {
                self.tm = IDENTITY;
                self.tlm = IDENTITY;
            }
            "Tf" => {
                if let Some(size) = operands.get(1).and_then(|o| o.as_float().ok()) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let [l] = floats(operands)[..] {
                    self.leading = l;
                }
            }
            "Td" => {
                if let [tx, ty] = floats(operands)[..] {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let [tx, ty] = floats(operands)[..] {
                    self.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = floats(operands)[..] {
                    self.tm = [a, b, c, d, e, f];
                    self.tlm = self.tm;
                }
            }
            "T*" => self.next_line(),
            "Tj" => self.show_string(operands.first()),
            "TJ" => self.show_array(operands.first()),
            "'" => {
                self.next_line();
                self.show_string(operands.first());
            }
            "\"" => {
                self.next_line();
                self.show_string(operands.get(2));
            }
            _ => {}
        }
    }
}

fn join_runs(runs: &mut [TextRun]) -> String {
    runs.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut line = String::new();
    let mut prev_end: Option<(f32, f32)> = None;
    for run in runs.iter() {
        if let Some((end, size)) = prev_end {
            let gap = run.x - end;
            if gap > SPACE_GAP_EM * size && !line.ends_with(' ') && !run.text.starts_with(' ') {
                line.push(' ');
            }
        }
        line.push_str(&run.text);
        prev_end = Some((run.end_x(), run.size));
    }
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visual lines of a page, top to bottom.
pub fn page_lines(operations: &[Operation]) -> Vec<String> {
    let mut state = TextState::new();
    for op in operations {
        state.apply(op);
    }

    let mut runs = state.runs;
    // PDF y grows upwards
    runs.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut lines = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    for run in runs {
        if let Some(first) = current.first() {
            let tolerance = (first.size.max(run.size) * LINE_TOLERANCE_EM).max(1.0);
            if (first.y - run.y).abs() > tolerance {
                lines.push(join_runs(&mut current));
                current.clear();
            }
        }
        current.push(run);
    }
    if !current.is_empty() {
        lines.push(join_runs(&mut current));
    }

    lines.retain(|l| !l.is_empty());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn cell(x: i64, y: i64, text: &str) -> Vec<Operation> {
        vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 10.into()]),
            op("Td", vec![x.into(), y.into()]),
            op("Tj", vec![Object::string_literal(text)]),
            op("ET", vec![]),
        ]
    }

    #[test]
    fn test_cells_on_one_baseline_form_a_row() {
        let mut ops = Vec::new();
        // Drawn right to left, and rows interleaved
        ops.extend(cell(400, 700, "25000.00"));
        ops.extend(cell(40, 680, "16-03-2024"));
        ops.extend(cell(300, 700, "-1500.00"));
        ops.extend(cell(40, 700, "15-03-2024"));
        ops.extend(cell(120, 700, "AMAZON PURCHASE"));
        ops.extend(cell(120, 680, "SWIGGY"));

        assert_eq!(
            page_lines(&ops),
            vec![
                "15-03-2024 AMAZON PURCHASE -1500.00 25000.00",
                "16-03-2024 SWIGGY",
            ]
        );
    }

    #[test]
    fn test_relative_moves_in_one_text_object() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 10.into()]),
            op("Td", vec![40.into(), 700.into()]),
            op("Tj", vec![Object::string_literal("20-03-2024")]),
            op("Td", vec![80.into(), 0.into()]),
            op("Tj", vec![Object::string_literal("SALARY CREDIT")]),
            op("Td", vec![180.into(), 0.into()]),
            op("Tj", vec![Object::string_literal("50000.00")]),
            op("ET", vec![]),
        ];
        assert_eq!(page_lines(&ops), vec!["20-03-2024 SALARY CREDIT 50000.00"]);
    }

    #[test]
    fn test_leading_and_next_line_operators() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 12.into()]),
            op("TL", vec![14.into()]),
            op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 800.into()]),
            op("Tj", vec![Object::string_literal("ICICI Bank")]),
            op("'", vec![Object::string_literal("Statement of account")]),
            op("T*", vec![]),
            op("Tj", vec![Object::string_literal("Page 1")]),
            op("ET", vec![]),
        ];
        assert_eq!(
            page_lines(&ops),
            vec!["ICICI Bank", "Statement of account", "Page 1"]
        );
    }

    #[test]
    fn test_kerned_array_keeps_words_together() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 10.into()]),
            op("Td", vec![40.into(), 500.into()]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("NET"),
                    (-20).into(),
                    Object::string_literal("FLIX"),
                    (-400).into(),
                    Object::string_literal("499.00"),
                ])],
            ),
            op("ET", vec![]),
        ];
        assert_eq!(page_lines(&ops), vec!["NETFLIX 499.00"]);
    }

    #[test]
    fn test_ctm_translation_applies() {
        let mut ops = vec![
            op("q", vec![]),
            op("cm", vec![1.into(), 0.into(), 0.into(), 1.into(), 0.into(), (-100).into()]),
        ];
        ops.extend(cell(40, 700, "shifted"));
        ops.push(op("Q", vec![]));
        ops.extend(cell(40, 650, "above"));

        assert_eq!(page_lines(&ops), vec!["above", "shifted"]);
    }

    #[test]
    fn test_no_text() {
        assert!(page_lines(&[op("re", vec![0.into(), 0.into(), 10.into(), 10.into()])]).is_empty());
    }
}
