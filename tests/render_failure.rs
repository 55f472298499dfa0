// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

// Fontconfig is configured per process, so this lives in its own test binary
// and starves the renderer of fonts without affecting other tests.

use latency_cdf::*;

use std::fs;
use std::path::Path;

use tempfile::TempDir;

fn config(dir: &Path) -> Config {
    Config::from_args(vec!["latency-cdf".into(), dir.as_os_str().to_owned()]).unwrap()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn failed_render_leaves_no_output() {
    let fonts = TempDir::new().unwrap();
    let fontconfig = fonts.path().join("fonts.conf");
    fs::write(
        &fontconfig,
        "<?xml version=\"1.0\"?>\n<fontconfig></fontconfig>\n",
    )
    .unwrap();
    std::env::set_var("FONTCONFIG_FILE", &fontconfig);

    // no previous plot
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("node0.log"), "tx1,1.0\ntx2,2.0\n").unwrap();

    let result = run(&config(dir.path()));
    assert!(matches!(result, Err(Error::Render { .. })));
    assert!(!dir.path().join("cdf.png").exists());
    assert_eq!(entries(dir.path()), vec!["node0.log"]);

    // a previous plot is kept as it was
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("node0.log"), "tx1,1.0\ntx2,2.0\n").unwrap();
    fs::write(dir.path().join("cdf.png"), "previous plot").unwrap();

    let result = run(&config(dir.path()));
    assert!(matches!(result, Err(Error::Render { .. })));
    assert_eq!(
        fs::read_to_string(dir.path().join("cdf.png")).unwrap(),
        "previous plot"
    );
    assert_eq!(entries(dir.path()), vec!["cdf.png", "node0.log"]);
}
