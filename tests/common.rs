#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated home: config, database, media, cache and gallery all live here.
pub struct TestHome {
    pub dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let home = Self {
            dir: tempfile::tempdir().expect("tempdir"),
        };
        let conf_dir = home.path().join(".esmlogger");
        fs::create_dir_all(&conf_dir).expect("config dir");
        let yaml = format!(
            "database: {}\nmedia_dir: {}\ncapture_dir: {}\ngallery_dir: {}\nalbum: ExperienceSampling\ndefault_sentiment: 2\n",
            home.db_path().display(),
            home.media_dir().display(),
            home.path().join("cache").display(),
            home.gallery_dir().display(),
        );
        fs::write(conf_dir.join("esmlogger.conf"), yaml).expect("config file");
        home
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.path().join("esm_data.sqlite")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.path().join("media")
    }

    pub fn gallery_dir(&self) -> PathBuf {
        self.path().join("Videos")
    }

    /// A fake source clip for `--clip`.
    pub fn source_clip(&self) -> PathBuf {
        let p = self.path().join("source.mp4");
        fs::write(&p, b"not really an mp4").expect("source clip");
        p
    }

    /// The binary, with HOME pointing here.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("esmlogger");
        cmd.env("HOME", self.path()).env("USERPROFILE", self.path());
        cmd
    }

    /// `init` in test mode (config file left alone).
    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    pub fn conn(&self) -> rusqlite::Connection {
        rusqlite::Connection::open(self.db_path()).expect("open db")
    }

    pub fn count(&self) -> i64 {
        self.conn()
            .query_row("SELECT COUNT(*) FROM logs", [], |r| r.get(0))
            .expect("count")
    }
}
