use anyhow::Result;
use git2::Repository;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use set_package_repo::{SyncOptions, Synchronizer};

/// A throwaway package directory, optionally under git
pub struct PackageScenario {
    /// Temporary directory for test
    pub temp_dir: TempDir,
    /// Path to package.json inside the temp dir
    pub manifest: PathBuf,
}

impl PackageScenario {
    /// Create a package with an `npm init -y` style manifest
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let manifest = temp_dir.path().join("package.json");
        let scenario = Self { temp_dir, manifest };
        scenario.write_manifest(
            &json!({
                "name": "demo",
                "version": "1.0.0",
                "description": "",
                "main": "index.js",
                "scripts": { "test": "echo \"Error: no test specified\" && exit 1" },
                "keywords": [],
                "author": "",
                "license": "ISC"
            }),
            2,
        )?;
        Ok(scenario)
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Initialize a git repository with the given remotes
    pub fn init_git(&self, remotes: &[(&str, &str)]) -> Result<Repository> {
        let repo = Repository::init(self.root())?;
        for (name, url) in remotes {
            repo.remote(name, url)?;
        }
        Ok(repo)
    }

    /// Write `value` as the manifest, indented by `width` spaces
    pub fn write_manifest(&self, value: &Value, width: usize) -> Result<()> {
        let indent = " ".repeat(width);
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(value, &mut serializer)?;
        buf.push(b'\n');
        fs::write(&self.manifest, buf)?;
        Ok(())
    }

    pub fn raw(&self) -> String {
        fs::read_to_string(&self.manifest).unwrap()
    }

    pub fn parsed(&self) -> Value {
        serde_json::from_str(&self.raw()).unwrap()
    }

    pub fn update(&self, options: SyncOptions) -> set_package_repo::SyncReport {
        Synchronizer::new(vec![])
            .synchronize(&self.manifest, &options)
            .unwrap()
    }
}

fn forced() -> SyncOptions {
    SyncOptions {
        force: true,
        ..SyncOptions::default()
    }
}

fn without_homepage() -> SyncOptions {
    SyncOptions {
        homepage: false,
        ..SyncOptions::default()
    }
}

#[test]
fn should_set_repository_info_when_missing() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();

    let report = scenario.update(SyncOptions::default());

    assert!(report.success);
    let parsed = scenario.parsed();
    assert_eq!(parsed["repository"]["type"], "git");
    assert_eq!(parsed["repository"]["url"], "https://example.com/acme/widgets");
    assert_eq!(parsed["homepage"], "https://example.com/acme/widgets");
}

#[test]
fn should_set_repository_as_https_when_ssh_remote_added() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "git@github.com:foo/bar.git")]).unwrap();

    assert!(scenario.update(SyncOptions::default()).success);
    assert_eq!(scenario.parsed()["repository"]["url"], "https://github.com/foo/bar");
}

#[test]
fn should_prefer_origin_over_other_remotes() {
    let scenario = PackageScenario::new().unwrap();
    scenario
        .init_git(&[
            ("alpha", "https://example.com/alpha/widgets"),
            ("origin", "https://example.com/acme/widgets"),
        ])
        .unwrap();

    assert!(scenario.update(SyncOptions::default()).success);
    assert_eq!(scenario.parsed()["repository"]["url"], "https://example.com/acme/widgets");
}

#[test]
fn should_return_success_when_all_already_set() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();

    scenario.update(SyncOptions::default());
    let first = scenario.raw();
    let report = scenario.update(SyncOptions::default());

    assert!(report.success);
    assert!(report.message.unwrap().contains("already set"));
    assert_eq!(scenario.raw(), first);
}

#[test]
fn should_fail_when_not_in_a_repository() {
    let scenario = PackageScenario::new().unwrap();
    let before = scenario.raw();

    let report = scenario.update(SyncOptions::default());

    assert!(!report.success);
    let message = report.message.unwrap();
    assert!(message.contains("initialised"));
    assert!(message.contains("repository"));
    assert_eq!(scenario.raw(), before);
}

#[test]
fn should_fail_when_repository_has_no_remotes() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[]).unwrap();

    let report = scenario.update(SyncOptions::default());

    assert!(!report.success);
    assert!(report.message.unwrap().contains("no remotes"));
}

#[test]
fn should_fail_when_repo_is_already_set_differently() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();
    let mut pkg = scenario.parsed();
    pkg["repository"] = json!({ "type": "git", "url": "https://example.com/other/thing" });
    scenario.write_manifest(&pkg, 2).unwrap();
    let before = scenario.raw();

    let report = scenario.update(SyncOptions::default());

    assert!(!report.success);
    assert!(report.message.unwrap().contains("--force"));
    assert_eq!(scenario.raw(), before);
}

#[test]
fn should_fail_when_homepage_already_set_differently() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();
    let mut pkg = scenario.parsed();
    pkg["homepage"] = json!("https://example.com/docs");
    scenario.write_manifest(&pkg, 2).unwrap();
    let before = scenario.raw();

    let report = scenario.update(SyncOptions::default());

    assert!(!report.success);
    assert!(report.message.unwrap().contains("--force"));
    assert_eq!(scenario.raw(), before);
}

#[test]
fn should_overwrite_repo_when_forced() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();
    let mut pkg = scenario.parsed();
    pkg["repository"] = json!({ "type": "git", "url": "https://example.com/other/thing" });
    scenario.write_manifest(&pkg, 2).unwrap();

    let report = scenario.update(forced());

    assert!(report.success);
    assert_eq!(
        scenario.parsed()["repository"],
        json!({ "type": "git", "url": "https://example.com/acme/widgets" })
    );
}

#[test]
fn should_overwrite_homepage_when_forced() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();
    let mut pkg = scenario.parsed();
    pkg["homepage"] = json!("https://example.com/docs");
    scenario.write_manifest(&pkg, 2).unwrap();

    assert!(scenario.update(forced()).success);
    assert_eq!(scenario.parsed()["homepage"], "https://example.com/acme/widgets");
}

#[test]
fn should_not_set_homepage_when_disabled() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();

    assert!(scenario.update(without_homepage()).success);
    assert!(scenario.parsed().get("homepage").is_none());
}

#[test]
fn should_not_overwrite_homepage_when_disabled() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "https://example.com/acme/widgets")]).unwrap();
    let mut pkg = scenario.parsed();
    pkg["homepage"] = json!("https://example.com/docs");
    scenario.write_manifest(&pkg, 2).unwrap();

    assert!(scenario.update(without_homepage()).success);
    assert_eq!(scenario.parsed()["homepage"], "https://example.com/docs");
}

#[test]
fn should_preserve_indentation_and_key_order() {
    for width in [2, 4] {
        let scenario = PackageScenario::new().unwrap();
        scenario.init_git(&[("origin", "git@github.com:foo/bar.git")]).unwrap();
        let pkg = scenario.parsed();
        scenario.write_manifest(&pkg, width).unwrap();

        assert!(scenario.update(SyncOptions::default()).success);

        let raw = scenario.raw();
        let indent = " ".repeat(width);
        assert!(raw.starts_with(&format!("{{\n{indent}\"name\": \"demo\",\n")), "{raw}");
        assert!(raw.contains(&format!("\n{indent}{indent}\"type\": \"git\",\n")), "{raw}");
        assert!(raw.ends_with("}\n"));

        let keys: Vec<String> = scenario
            .parsed()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            [
                "name", "version", "description", "main", "scripts", "keywords", "author",
                "license", "homepage", "repository"
            ]
        );
    }
}

#[test]
fn should_find_repository_from_nested_package() {
    let scenario = PackageScenario::new().unwrap();
    scenario.init_git(&[("origin", "git@github.com:foo/monorepo.git")]).unwrap();
    let nested = scenario.root().join("packages").join("app");
    fs::create_dir_all(&nested).unwrap();
    let manifest = nested.join("package.json");
    fs::write(&manifest, "{\n  \"name\": \"app\"\n}\n").unwrap();

    let report = Synchronizer::new(vec![])
        .synchronize(&manifest, &SyncOptions::default())
        .unwrap();

    assert!(report.success);
    let parsed: Value = serde_json::from_str(&fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(parsed["repository"]["url"], "https://github.com/foo/monorepo");
}
