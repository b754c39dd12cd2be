//! Integration test: results directory -> report -> figures
//!
//! Builds a scratch results directory the way the experiment driver lays it
//! out and runs the full analysis against it.

use packstat::analysis::Analyzer;
use packstat::config::AnalysisConfig;
use packstat::series::{AxisScale, Figure, JsonFigureWriter, SeriesRenderer};
use packstat::stats::Verdict;
use packstat::Error;
use std::fs;
use std::path::Path;

fn write_results(dir: &Path, with_optional: bool) {
    let results = dir.join("results");
    fs::create_dir_all(&results).unwrap();

    let mut epsilon = String::from("alg,m,epsilon\n");
    for i in 1..=10u64 {
        let m = 500 * i;
        epsilon.push_str(&format!("NFDH,{m},{}\n", 0.05 + 0.001 * i as f64));
        epsilon.push_str(&format!("FFDH,{m},{}\n", 0.03 + 0.001 * i as f64));
    }
    fs::write(results.join("epsilon_n1024.csv"), epsilon).unwrap();

    if with_optional {
        fs::write(
            results.join("epsilon_workload.csv"),
            "alg,m,epsilon\nNFDH,500,0.02\nFFDH,500,0.04\nNFDH,1000,0.02\nFFDH,1000,0.04\nNFDH,1500,0.02\nFFDH,1500,0.04\n",
        )
        .unwrap();
        fs::write(
            results.join("time_n1024.csv"),
            "alg,m,time_sec\nNFDH,1000,0.002\nNFDH,500,0.001\nFFDH,500,0.003\nFFDH,1000,0.006\n",
        )
        .unwrap();
    }
}

fn config(dir: &Path) -> AnalysisConfig {
    AnalysisConfig::builder()
        .results_dir(dir.join("results"))
        .plots_dir(dir.join("plots"))
        .build()
        .unwrap()
}

/// Renderer that keeps figures in memory
#[derive(Default)]
struct Recorder {
    figures: Vec<Figure>,
}

impl SeriesRenderer for Recorder {
    fn render(&mut self, figure: &Figure) -> packstat::Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

#[test]
fn test_full_pipeline_with_optional_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_results(dir.path(), true);

    let analyzer = Analyzer::new(config(dir.path()));
    let report = analyzer.run().unwrap();

    assert!(matches!(
        report.primary.comparison.verdict(),
        Verdict::MoreAccurate { winner, .. } if winner == "FFDH"
    ));
    // The workload sweep is judged on its own and disagrees
    let workload = report.workload.as_ref().unwrap();
    assert!(matches!(
        workload.comparison.verdict(),
        Verdict::MoreAccurate { winner, .. } if winner == "NFDH"
    ));
    assert!(report.pooled.is_none());

    // time_n4096.csv is absent and silently skipped
    assert_eq!(report.runtime.len(), 1);
    assert_eq!(report.runtime[0].universe, 1024);
    let nfdh = &report.runtime[0].series[0];
    assert_eq!(nfdh.label(), "NFDH, n=1024");
    assert_eq!(nfdh.points()[0].x, 500.0);

    let mut recorder = Recorder::default();
    assert_eq!(analyzer.render(&report, &mut recorder).unwrap(), 2);
    let names: Vec<&str> = recorder.figures.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["time_vs_m", "epsilon_vs_m"]);
    assert_eq!(recorder.figures[0].series.len(), 2);
    assert_eq!(recorder.figures[0].x_scale(), AxisScale::Linear);

    let text = report.to_string();
    assert!(text.contains("uniform random sweep, n=1024"));
    assert!(text.contains("workload-derived sweep"));
    assert!(text.contains("NFDH, n=1024: 2 points"));
}

#[test]
fn test_pooling_only_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    write_results(dir.path(), true);

    let mut config = config(dir.path());
    config.pool_workloads = true;
    let report = Analyzer::new(config).run().unwrap();

    let pooled = report.pooled.as_ref().unwrap();
    assert_eq!(pooled.comparison.first().summary().unwrap().count(), 13);
}

#[test]
fn test_missing_mandatory_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("results")).unwrap();

    let err = Analyzer::new(config(dir.path())).run().unwrap_err();
    match err {
        Error::MissingTable { path, remediation } => {
            assert!(path.ends_with("epsilon_n1024.csv"));
            assert!(remediation.contains("experiment driver"));
        }
        other => panic!("expected MissingTable, got {other:?}"),
    }
}

#[test]
fn test_json_report_and_figures_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_results(dir.path(), false);

    let analyzer = Analyzer::new(config(dir.path()));
    let report = analyzer.run().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["generated_at"].is_string());
    assert!(json["workload"].is_null());
    assert_eq!(json["primary"]["comparison"]["verdict"]["winner"], "FFDH");

    let mut writer = JsonFigureWriter::new(&analyzer.config().plots_dir);
    assert_eq!(analyzer.render(&report, &mut writer).unwrap(), 1);
    let figure = dir.path().join("plots").join("epsilon_vs_m.json");
    assert!(figure.exists());
    assert!(!dir.path().join("plots").join("time_vs_m.json").exists());
}

#[test]
fn test_epsilon_figure_only_plots_compared_pair() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    fs::create_dir_all(&results).unwrap();
    fs::write(
        results.join("epsilon_n1024.csv"),
        "alg,m,epsilon\nBFDH,500,0.09\nNFDH,500,0.08\nFFDH,500,0.05\nBFDH,1000,0.07\n",
    )
    .unwrap();

    let report = Analyzer::new(config(dir.path())).run().unwrap();
    let labels: Vec<&str> = report.epsilon_series.iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["NFDH", "FFDH"]);
}

#[test]
fn test_config_file_drives_layout() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("out");
    fs::create_dir_all(&results).unwrap();
    fs::write(results.join("eps.tsv.txt"), "algo|size|eps\nA|10|0.2\nB|10|0.2\n").unwrap();

    let config_path = dir.path().join("packstat.json");
    fs::write(
        &config_path,
        serde_json::json!({
            "results_dir": results,
            "epsilon_table": "eps.tsv.txt",
            "algorithms": ["A", "B"],
            "delimiter": "|",
            "runtime_universes": [],
            "columns": { "algorithm": "algo", "input_size": "size", "epsilon": "eps" }
        })
        .to_string(),
    )
    .unwrap();

    let config = AnalysisConfig::from_json_file(&config_path).unwrap();
    let report = Analyzer::new(config).run().unwrap();
    assert_eq!(report.primary.comparison.verdict(), &Verdict::Tie { mean: 0.2 });
}
