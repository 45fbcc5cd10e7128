use std::fmt;
use std::path::PathBuf;

use crate::config::{DatasetGroup, LauncherConfig, Mode};
use crate::platform::{resolve_bin_dir, Platform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub server: LaunchCommand,
    pub client: LaunchCommand,
}

impl LaunchPlan {
    /// The Server gets every dataset path for the mode, one argument each,
    /// in category order. The Client only gets the host to connect to.
    pub fn build(config: &LauncherConfig, platform: Platform, mode: Mode) -> Self {
        let bin_dir = resolve_bin_dir(platform, &config.bin_dir);
        let datasets = DatasetGroup::for_mode(&config.data_dir, mode);

        let server = LaunchCommand {
            program: platform.executable(&bin_dir, "Server"),
            args: datasets
                .paths()
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        };
        let client = LaunchCommand {
            program: platform.executable(&bin_dir, "Client"),
            args: vec![config.host.clone()],
        };

        Self { server, client }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_on_unix() {
        let config = LauncherConfig::default();
        let plan = LaunchPlan::build(&config, Platform::Unix, Mode::Test);

        assert_eq!(plan.server.program, PathBuf::from("src").join("Server"));
        assert_eq!(plan.server.args.len(), 6);
        assert!(plan.server.args.iter().all(|a| a.ends_with("_small.bin")));
        assert_eq!(plan.client.program, PathBuf::from("src").join("Client"));
        assert_eq!(plan.client.args, ["localhost"]);
    }

    #[test]
    fn eval_plan_points_at_test_suite() {
        let config = LauncherConfig::default();
        let plan = LaunchPlan::build(&config, Platform::Unix, Mode::Eval);
        assert!(plan.server.args.iter().all(|a| a.ends_with("_test.bin")));
        assert_eq!(plan.client.args, ["localhost"]);
    }

    #[test]
    fn windows_plan_resolves_build_subdir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("Release")).unwrap();
        let config = LauncherConfig {
            bin_dir: tmp.path().to_path_buf(),
            ..LauncherConfig::default()
        };

        let plan = LaunchPlan::build(&config, Platform::Windows, Mode::Test);
        assert_eq!(plan.server.program, tmp.path().join("Release").join("Server.exe"));
        assert_eq!(plan.client.program, tmp.path().join("Release").join("Client.exe"));
    }

    #[test]
    fn command_line_is_space_joined() {
        let cmd = LaunchCommand {
            program: PathBuf::from("bin/Server"),
            args: vec!["a.bin".into(), "b.bin".into()],
        };
        assert_eq!(cmd.to_string(), "bin/Server a.bin b.bin");
    }
}
