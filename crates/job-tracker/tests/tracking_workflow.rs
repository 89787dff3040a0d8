use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use job_tracker::browser::{BrowserSession, NavigationError};
use job_tracker::config::{
    AppConfig, BrowserConfig, PacingConfig, PortalCredentials, StoreConfig, TelemetryConfig,
    WorkdayCredentials,
};
use job_tracker::store::{CsvWorkbook, RecordStore};
use job_tracker::workflows::tracking::{
    summarize, CredentialCacheStore, CredentialSlot, DelayWindow, Pacer, RunCoordinator,
    SheetStatus,
};

/// Serves fixed page text per URL; Workday logins always succeed.
#[derive(Default)]
struct CannedBrowser {
    pages: HashMap<String, String>,
    timeouts: Vec<String>,
    current: String,
    visited: Vec<String>,
}

impl BrowserSession for CannedBrowser {
    fn goto(&mut self, url: &str) -> Result<(), NavigationError> {
        self.visited.push(url.to_string());
        if self.timeouts.iter().any(|timeout| timeout == url) {
            return Err(NavigationError::Timeout {
                url: url.to_string(),
            });
        }
        self.current = url.to_string();
        Ok(())
    }

    fn fill(&mut self, _selector: &str, _value: &str) -> Result<(), NavigationError> {
        Ok(())
    }

    fn click(&mut self, _selector: &str) -> Result<(), NavigationError> {
        Ok(())
    }

    fn press_key(&mut self, _key: &str) -> Result<(), NavigationError> {
        self.current = self.current.replace("login.htm", "home.htm");
        Ok(())
    }

    fn wait_for_settle(&mut self) -> Result<(), NavigationError> {
        Ok(())
    }

    fn current_url(&self) -> String {
        self.current.clone()
    }

    fn content(&mut self) -> Result<String, NavigationError> {
        Ok(self.pages.get(&self.current).cloned().unwrap_or_default())
    }
}

struct NoWait;

impl Pacer for NoWait {
    fn pause(&mut self, _duration: Duration) {}
}

fn config(workbook: &Path, cache_path: PathBuf) -> AppConfig {
    AppConfig {
        store: StoreConfig::CsvWorkbook {
            directory: workbook.to_path_buf(),
        },
        browser: BrowserConfig {
            headless: true,
            navigation_timeout: Duration::from_secs(45),
        },
        credentials: PortalCredentials {
            linkedin: None,
            workday: Some(WorkdayCredentials {
                email: "candidate@example.com".to_string(),
                passwords: ["one".to_string(), "two".to_string()],
            }),
        },
        cache_path,
        pacing: PacingConfig {
            row_delay: DelayWindow::new(Duration::ZERO, Duration::ZERO).expect("valid window"),
            ..PacingConfig::default()
        },
        telemetry: TelemetryConfig {
            log_level: "info".to_string(),
        },
    }
}

#[test]
fn csv_workbook_run_fills_pending_decisions_in_place() {
    let dir = tempfile::tempdir().expect("temp dir");
    let workbook_dir = dir.path().join("workbook");
    fs::create_dir(&workbook_dir).expect("workbook dir");
    fs::write(
        workbook_dir.join("applications.csv"),
        "Company,URL,Decision,Notes\n\
         Acme,https://acme.wd1.myworkdayjobs.com/job/1,,referral\n\
         Globex,https://boards.greenhouse.io/globex/jobs/2,,\n\
         Initech,https://jobs.lever.co/initech/3,JOB CLOSED (lever),\n\
         Hooli,https://careers.hooli.example/4,,\n",
    )
    .expect("write worksheet");
    let cache_path = dir.path().join("workday_cache.json");

    let browser = CannedBrowser {
        pages: HashMap::from([
            (
                "https://acme.wd1.myworkdayjobs.com/job/1".to_string(),
                "Candidate home: Not Selected".to_string(),
            ),
            (
                "https://careers.hooli.example/4".to_string(),
                "Sorry, this position has been filled".to_string(),
            ),
        ]),
        timeouts: vec!["https://boards.greenhouse.io/globex/jobs/2".to_string()],
        ..CannedBrowser::default()
    };

    let workbook = CsvWorkbook::open(&workbook_dir).expect("workbook opens");
    let config = config(&workbook_dir, cache_path.clone());
    let mut coordinator = RunCoordinator::new(&workbook, browser, NoWait, &config);
    let summary = coordinator.run().expect("run completes");

    assert!(!summary.linkedin_signed_in);
    assert_eq!(summary.total_updated(), 3);
    assert_eq!(summary.sheets[0].status, SheetStatus::Updated { rows: 3 });
    assert!(coordinator
        .session()
        .visited
        .iter()
        .all(|url| !url.contains("linkedin.com")));

    let rows = workbook.read_rows("applications").expect("rows");
    assert_eq!(
        rows[1],
        [
            "Acme",
            "https://acme.wd1.myworkdayjobs.com/job/1",
            "APPLICATION REJECTED (Workday)",
            "referral",
        ]
    );
    assert_eq!(rows[2][2], "ERROR: TimeoutError");
    assert_eq!(rows[3][2], "JOB CLOSED (lever)");
    assert_eq!(rows[4][2], "JOB CLOSED (generic)");

    let cache = CredentialCacheStore::new(&cache_path).load();
    assert_eq!(cache.get("acme"), Some(CredentialSlot::First));

    let overview = summarize(&workbook).expect("summary");
    assert_eq!(overview.applications, 4);
    assert_eq!(overview.pending, 0);
    assert_eq!(overview.by_decision.get("JOB CLOSED (lever)"), Some(&1));
}

#[test]
fn second_run_leaves_completed_rows_alone() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("done.csv"),
        "URL,Decision\nhttps://jobs.lever.co/acme/1,APPLICATION VIEWED (LinkedIn)\n",
    )
    .expect("write worksheet");
    let before = fs::read_to_string(dir.path().join("done.csv")).expect("read");

    let workbook = CsvWorkbook::open(dir.path()).expect("workbook opens");
    let config = config(dir.path(), dir.path().join("cache.json"));
    let mut coordinator = RunCoordinator::new(&workbook, CannedBrowser::default(), NoWait, &config);
    let summary = coordinator.run().expect("run completes");

    assert_eq!(summary.total_updated(), 0);
    assert!(coordinator.session().visited.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("done.csv")).expect("read"),
        before
    );
}
