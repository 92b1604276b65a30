//! Text (terminal) reporter

use crate::models::AnalysisReport;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Render the run summary plus the ranked path table.
pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Ruletrace Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Graph: {CYAN}{}{RESET}  Target: {CYAN}{}{RESET}\n",
        report.graph, report.target
    ));
    out.push_str(&format!(
        "Nodes: {}  Edges: {}  Paths: {BOLD}{}{RESET}",
        report.summary.nodes, report.summary.edges, report.summary.paths_found
    ));
    if report.summary.truncated {
        out.push_str(&format!("  {RED}{BOLD}(TRUNCATED){RESET}"));
    }
    out.push_str("\n\n");

    if !report.warnings.is_empty() {
        out.push_str(&format!(
            "{BOLD}WARNINGS{RESET} ({})\n",
            report.warnings.len()
        ));
        for warning in &report.warnings {
            out.push_str(&format!("  {YELLOW}!{RESET} {}\n", warning));
        }
        out.push('\n');
    }

    if report.paths.is_empty() {
        out.push_str(&format!(
            "{DIM}No attack path reaches the target.{RESET}\n"
        ));
        return out;
    }

    // Top paths by criticality; the full set lives in the CSV artifact.
    let mut ranked: Vec<usize> = (0..report.paths.len()).collect();
    ranked.sort_by(|&a, &b| {
        let (pa, pb) = (&report.paths[a], &report.paths[b]);
        pb.criticality
            .partial_cmp(&pa.criticality)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(pa.cost.partial_cmp(&pb.cost).unwrap_or(std::cmp::Ordering::Equal))
            .then(pa.id.cmp(&pb.id))
    });

    out.push_str(&format!(
        "{DIM}   ID   COST  STEALTH  LEN  CRIT   PATH{RESET}\n"
    ));
    out.push_str(&format!(
        "{DIM}  ──────────────────────────────────────────────────────────────{RESET}\n"
    ));
    for &i in ranked.iter().take(10) {
        let path = &report.paths[i];
        let sequence: String = path.sequence().chars().take(60).collect();
        let sequence = if path.sequence().chars().count() > 60 {
            format!("{}...", sequence)
        } else {
            sequence
        };
        out.push_str(&format!(
            "  {DIM}{:>3}{RESET}  {:>5.1}  {:>7.2}  {:>3}  {:.3}  {}\n",
            path.id, path.cost, path.avg_stealth, path.length, path.criticality, sequence
        ));
    }
    let remaining = report.paths.len().saturating_sub(10);
    if remaining > 0 {
        out.push_str(&format!(
            "\n  {DIM}...and {} more in the exported table{RESET}\n",
            remaining
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportSummary, ScoredPath, Warning};

    fn report() -> AnalysisReport {
        let mut report = AnalysisReport::new("building.dot", "A_t");
        report.paths = vec![ScoredPath {
            id: 1,
            nodes: vec!["T_1".into(), "A_t".into()],
            cost: 1.0,
            avg_stealth: 1.0,
            length: 1,
            criticality: 0.5,
        }];
        report.warnings = vec![Warning::DegenerateGate {
            node: "LOGIC_X_AND".into(),
            in_degree: 1,
        }];
        report.summary = ReportSummary {
            nodes: 2,
            edges: 1,
            paths_found: 1,
            truncated: false,
            warnings: 1,
        };
        report
    }

    #[test]
    fn test_render_mentions_target_paths_and_warnings() {
        let out = render(&report());
        assert!(out.contains("A_t"));
        assert!(out.contains("T_1 -> A_t"));
        assert!(out.contains("LOGIC_X_AND"));
    }

    #[test]
    fn test_render_marks_truncation() {
        let mut r = report();
        r.summary.truncated = true;
        assert!(render(&r).contains("TRUNCATED"));
    }

    #[test]
    fn test_render_empty_result() {
        let mut r = report();
        r.paths.clear();
        r.summary.paths_found = 0;
        assert!(render(&r).contains("No attack path"));
    }
}
