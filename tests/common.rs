use alldisable::config::ExclusionConfig;
use alldisable::context::AppContext;
use alldisable::settings::Settings;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// File name the tests pretend the running program has.
#[allow(dead_code)]
pub const PROGRAM_NAME: &str = "self.exe";

#[allow(dead_code)]
pub fn config_excluding(extensions: &[&str]) -> ExclusionConfig {
    ExclusionConfig {
        excluded_extensions: extensions
            .iter()
            .map(|ext| (ext.to_string(), true))
            .collect::<BTreeMap<_, _>>(),
        ..Default::default()
    }
}

/// A managed directory plus a separate config directory, both temporary.
pub struct TestEnvironment {
    // TempDir is kept to ensure cleanup happens when TestEnvironment is dropped
    #[allow(dead_code)]
    pub(crate) temp_dir: TempDir,
    pub work_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().join("managed");
        let config_dir = temp_dir.path().join("config");
        fs::create_dir_all(&work_dir).expect("Failed to create managed directory");
        Self {
            temp_dir,
            work_dir,
            config_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.work_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn create_file(&self, filename: &str, content: &str) -> PathBuf {
        let file_path = self.work_dir.join(filename);
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn create_files(&self, filenames: &[&str]) {
        for name in filenames {
            self.create_file(name, name);
        }
    }

    /// Sorted names currently in the managed directory.
    pub fn listing(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.work_dir)
            .expect("Failed to read managed directory")
            .map(|entry| {
                entry
                    .expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    pub fn context(&self, config: ExclusionConfig) -> Arc<AppContext> {
        let settings = Settings::new(self.config_path(), config);
        Arc::new(AppContext::new(
            self.work_dir.clone(),
            OsString::from(PROGRAM_NAME),
            settings,
        ))
    }

    /// Tracked file names, in set order.
    pub fn tracked_names(&self, ctx: &AppContext) -> Vec<String> {
        ctx.tracked_paths()
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}
