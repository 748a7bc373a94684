use clap::Parser;
use dupverify::cli::{normalize_args, Cli};
use dupverify::config::{RunConfig, Settings};
use dupverify::error::ExitCode;
use dupverify::output::OutputFormat;
use dupverify::scanner::DigestAlgorithm;
use figment::Jail;
use std::fs;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["dupverify"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(normalize_args(argv)).unwrap()
}

#[test]
fn test_config_file_selects_json_and_blake3() {
    Jail::expect_with(|jail| {
        let root = jail.directory().join("data");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a"), b"twin").unwrap();
        fs::write(root.join("b"), b"twin").unwrap();
        jail.create_file(
            "dupverify.toml",
            r#"
                algorithm = "blake3"
                output = "json"
            "#,
        )?;

        let cli = parse(&[
            "--target",
            root.to_str().unwrap(),
            "--searchpattern",
            "*",
            "--config",
            "dupverify.toml",
            "-q",
        ]);
        let settings = Settings::load(cli.config.as_deref()).unwrap();
        let config = RunConfig::resolve(&cli, settings);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.algorithm, DigestAlgorithm::Blake3);

        let mut out = Vec::new();
        let code = dupverify::run(&config, &mut out).unwrap();
        assert_eq!(code, ExitCode::Success);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["algorithm"], "blake3");
        assert_eq!(
            value["groups"][0]["hash"],
            blake3::hash(b"twin").to_hex().as_str()
        );
        Ok(())
    });
}

#[test]
fn test_env_overrides_file_and_cli_overrides_env() {
    Jail::expect_with(|jail| {
        jail.create_file("dupverify.toml", "io_threads = 2\noutput = \"json\"")?;
        jail.set_env("DUPVERIFY_IO_THREADS", "3");
        jail.set_env("DUPVERIFY_OUTPUT", "text");

        let dir = jail.directory().to_str().unwrap().to_string();
        let cli = parse(&[
            "--target",
            &dir,
            "--searchpattern",
            "*",
            "--config",
            "dupverify.toml",
            "--io-threads",
            "5",
        ]);
        let config = RunConfig::resolve(&cli, Settings::load(cli.config.as_deref()).unwrap());

        assert_eq!(config.io_threads, 5);
        assert_eq!(config.output, OutputFormat::Text);
        Ok(())
    });
}

#[test]
fn test_text_run_writes_report() {
    Jail::expect_with(|jail| {
        let root = jail.directory().join("pics");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("1.jpg"), b"img").unwrap();
        fs::write(root.join("2.jpg"), b"img").unwrap();

        let cli = parse(&["-target", root.to_str().unwrap(), "-searchpattern", "*.jpg"]);
        let config = RunConfig::resolve(&cli, Settings::default());

        let mut out = Vec::new();
        dupverify::run(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Found 1 distinct file with duplicates.\n\n"));
        assert!(text.contains(&format!("File: {}", root.join("1.jpg").display())));
        assert!(Path::new(&root.join("2.jpg")).exists());
        Ok(())
    });
}
