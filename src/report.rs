use std::fmt::Write;

use crate::classifier::ComparisonReport;

const BAR_WIDTH: usize = 40;

/// Per-model result blocks followed by the grouped confidence chart.
pub fn render_report(report: &ComparisonReport) -> String {
    let mut out = String::new();
    for verdict in &report.verdicts {
        let _ = writeln!(out, "🔹 {}", verdict.model);
        let _ = writeln!(out, "   label:      {}", verdict.canonical_label);
        let _ = writeln!(out, "   raw token:  {}", verdict.raw_label);
        let _ = writeln!(out, "   confidence: {:.4}", verdict.confidence);
        out.push('\n');
    }
    out.push_str(&render_chart(report));
    out
}

/// One group per canonical class, one bar per model, confidence annotated
/// on each bar.
pub fn render_chart(report: &ComparisonReport) -> String {
    let name_width = report
        .verdicts
        .iter()
        .map(|v| v.model.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (position, class) in report.classes.iter().enumerate() {
        let _ = writeln!(out, "{class}");
        for verdict in &report.verdicts {
            let p = verdict.vector.0[position];
            let filled = (p * BAR_WIDTH as f32).round() as usize;
            let bar: String = "█".repeat(filled.min(BAR_WIDTH));
            let _ = writeln!(out, "  {:<name_width$} │{bar} {p:.4}", verdict.model);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::vector::ConfidenceVector;
    use crate::classifier::ModelVerdict;

    fn sample_report() -> ComparisonReport {
        ComparisonReport {
            profile: "indo-hoax".into(),
            classes: ["HOAX".into(), "NON-HOAX".into()],
            verdicts: vec![
                ModelVerdict {
                    model: "XLM-RoBERTa".into(),
                    raw_label: "LABEL_0".into(),
                    canonical_label: "HOAX".into(),
                    confidence: 0.87,
                    vector: ConfidenceVector([0.87, 0.13]),
                },
                ModelVerdict {
                    model: "IndoBERT".into(),
                    raw_label: "0".into(),
                    canonical_label: "HOAX".into(),
                    confidence: 0.75,
                    vector: ConfidenceVector([0.75, 0.25]),
                },
            ],
        }
    }

    #[test]
    fn chart_groups_by_class_with_one_bar_per_model() {
        let chart = render_chart(&sample_report());
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "HOAX");
        assert_eq!(lines[3], "NON-HOAX");
        assert!(lines[1].contains("XLM-RoBERTa"));
        assert!(lines[2].contains("IndoBERT"));
    }

    #[test]
    fn bars_scale_with_confidence_and_carry_annotations() {
        let chart = render_chart(&sample_report());
        let hoax_roberta = chart.lines().nth(1).unwrap();
        assert_eq!(hoax_roberta.matches('█').count(), 35); // 0.87 * 40
        assert!(hoax_roberta.ends_with("0.8700"));

        let nonhoax_indobert = chart.lines().nth(5).unwrap();
        assert_eq!(nonhoax_indobert.matches('█').count(), 10); // 0.25 * 40
        assert!(nonhoax_indobert.ends_with("0.2500"));
    }

    #[test]
    fn report_shows_label_and_confidence_per_model() {
        let rendered = render_report(&sample_report());
        assert!(rendered.contains("🔹 XLM-RoBERTa"));
        assert!(rendered.contains("label:      HOAX"));
        assert!(rendered.contains("confidence: 0.8700"));
        assert!(rendered.contains("raw token:  LABEL_0"));
    }
}
