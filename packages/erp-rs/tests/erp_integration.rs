use erp_rs::{
    analyze_files, calc_mean_erp_from_files, ErpError, ErpPresenter, LoadOptions,
    SvgPlotPresenter, WindowParameters,
};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Helper to write a headerless CSV into the test directory
fn write_csv(dir: &Path, name: &str, rows: &[String]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    path
}

/// 2000-sample signal with a 0..1 ramp over samples 500..1701
fn ramp_signal() -> Vec<f64> {
    let mut signal = vec![0.0; 2000];
    for i in 0..1201 {
        signal[500 + i] = i as f64 / 1200.0;
    }
    signal
}

fn signal_rows(signal: &[f64]) -> Vec<String> {
    signal.iter().map(|v| format!("{:?}", v)).collect()
}

#[test]
fn test_default_window_gives_five_by_1201() {
    let dir = TempDir::new().unwrap();
    let signal: Vec<f64> = (0..6000).map(|i| (i as f64 * 0.01).sin()).collect();
    let events: Vec<String> = (0..20)
        .map(|i| format!("{},{},{}", 300 + i * 250, 320 + i * 250, i % 5 + 1))
        .collect();

    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&signal));

    let erp = calc_mean_erp_from_files(&events_path, &signal_path, WindowParameters::default())
        .unwrap();
    assert_eq!(erp.dim(), (5, 1201));
}

#[test]
fn test_ramp_scenario_only_finger_three_has_data() {
    let dir = TempDir::new().unwrap();
    let signal = ramp_signal();
    let events_path = write_csv(dir.path(), "events.csv", &["500,550,3".to_string()]);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&signal));

    let err = calc_mean_erp_from_files(&events_path, &signal_path, WindowParameters::default())
        .unwrap_err();
    assert!(matches!(err, ErpError::NoDataForFinger(1)));
}

#[test]
fn test_ramp_epoch_is_reproduced_when_every_finger_has_it() {
    let dir = TempDir::new().unwrap();
    let signal = ramp_signal();
    let events: Vec<String> = (1..=5).map(|f| format!("500,550,{}", f)).collect();
    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&signal));

    let erp = calc_mean_erp_from_files(&events_path, &signal_path, WindowParameters::default())
        .unwrap();
    for row in erp.outer_iter() {
        assert_eq!(row.to_vec(), signal[300..1501].to_vec());
    }
}

#[test]
fn test_trial_too_close_to_start_is_dropped() {
    let dir = TempDir::new().unwrap();
    let signal = vec![0.0; 3000];
    let mut events: Vec<String> = (1..=4).map(|f| format!("1000,1010,{}", f)).collect();
    events.push("50,60,5".to_string());

    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&signal));

    let err = calc_mean_erp_from_files(&events_path, &signal_path, WindowParameters::default())
        .unwrap_err();
    assert!(matches!(err, ErpError::NoDataForFinger(5)));
}

#[test]
fn test_two_trials_average() {
    let dir = TempDir::new().unwrap();
    let mut signal = vec![0.0; 30];
    signal[1..4].copy_from_slice(&[1.0, 1.0, 1.0]);
    signal[6..9].copy_from_slice(&[3.0, 3.0, 3.0]);
    let mut events = vec!["2,2,1".to_string(), "7,7,1".to_string()];
    events.extend((2..=5).map(|f| format!("20,20,{}", f)));

    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&signal));

    let erp = calc_mean_erp_from_files(&events_path, &signal_path, WindowParameters::new(1, 1))
        .unwrap();
    assert_eq!(erp.row(0).to_vec(), vec![2.0, 2.0, 2.0]);
}

#[test]
fn test_invalid_finger_id_in_file() {
    let dir = TempDir::new().unwrap();
    let events: Vec<String> = (0..=5).map(|f| format!("10,10,{}", f)).collect();
    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&[0.0; 30]));

    let err = calc_mean_erp_from_files(&events_path, &signal_path, WindowParameters::new(1, 1))
        .unwrap_err();
    assert!(matches!(err, ErpError::InvalidFingerId { row: 0, finger_id: 0 }));
}

#[test]
fn test_missing_signal_file() {
    let dir = TempDir::new().unwrap();
    let events_path = write_csv(dir.path(), "events.csv", &["10,10,1".to_string()]);

    let err = calc_mean_erp_from_files(
        &events_path,
        dir.path().join("missing.csv"),
        WindowParameters::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ErpError::FileNotFound(_)));
}

#[test]
fn test_multi_column_signal_uses_first_column() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<String> = (0..40).map(|i| format!("{},{}", i, 1000 - i)).collect();
    let events: Vec<String> = (1..=5).map(|f| format!("20,25,{}", f)).collect();
    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &rows);

    let result = analyze_files(
        &events_path,
        &signal_path,
        WindowParameters::new(1, 2),
        LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(result.erp_matrix[0], vec![19.0, 20.0, 21.0, 22.0]);
    assert_eq!(result.n_discarded, 0);
}

#[test]
fn test_result_can_be_plotted() {
    let dir = TempDir::new().unwrap();
    let signal: Vec<f64> = (0..500).map(|i| (i as f64 * 0.05).cos()).collect();
    let events: Vec<String> = (0..10)
        .map(|i| format!("{},0,{}", 100 + i * 30, i % 5 + 1))
        .collect();
    let events_path = write_csv(dir.path(), "events.csv", &events);
    let signal_path = write_csv(dir.path(), "signal.csv", &signal_rows(&signal));
    let window = WindowParameters::new(50, 100);

    let erp = calc_mean_erp_from_files(&events_path, &signal_path, window).unwrap();
    let plot_path = dir.path().join("erp.svg");
    SvgPlotPresenter::new(&plot_path)
        .present(erp.view(), window)
        .unwrap();

    assert!(plot_path.exists());
}
