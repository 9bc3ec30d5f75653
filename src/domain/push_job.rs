//! Push job identity: job name and grouping labels.
//!
//! Derived once from the deployment config. The job name is the
//! instance id, prefixed with the app name when one is configured.
//! Groupings keep insertion order (app, stage, dyno type) because the
//! Pushgateway path is built from them in that order.

use crate::config::DeploymentConfig;

/// Grouping label carrying the application name.
pub const APP_LABEL: &str = "heroku_app";

/// Grouping label carrying the deployment stage.
pub const STAGE_LABEL: &str = "stage";

/// Grouping label carrying the instance identifier.
pub const INSTANCE_LABEL: &str = "heroku_dyno_type";

/// Job name plus grouping key for a Pushgateway push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushJob {
    /// Job name (`<instance>` or `<app> <instance>`).
    pub name: String,
    /// Grouping labels as ordered key/value pairs.
    pub groupings: Vec<(String, String)>,
}

impl PushJob {
    /// Derive the job from deployment identity.
    pub fn from_deployment(deployment: &DeploymentConfig) -> Self {
        let mut groupings = Vec::with_capacity(3);

        let name = match deployment.app_name.as_deref() {
            Some(app) => {
                groupings.push((APP_LABEL.to_string(), app.to_string()));
                format!("{app} {}", deployment.instance_id)
            }
            None => deployment.instance_id.clone(),
        };

        if !deployment.stage.is_empty() {
            groupings.push((STAGE_LABEL.to_string(), deployment.stage.clone()));
        }
        if !deployment.instance_id.is_empty() {
            groupings.push((INSTANCE_LABEL.to_string(), deployment.instance_id.clone()));
        }

        Self { name, groupings }
    }

    /// Look up a grouping value by label name.
    pub fn grouping(&self, label: &str) -> Option<&str> {
        self.groupings
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(stage: &str, instance: &str, app: Option<&str>) -> DeploymentConfig {
        DeploymentConfig {
            stage: stage.to_string(),
            instance_id: instance.to_string(),
            app_name: app.map(str::to_string),
        }
    }

    #[test]
    fn test_job_without_app_name() {
        let job = PushJob::from_deployment(&deployment("dev", "web.1", None));

        assert_eq!(job.name, "web.1");
        assert_eq!(
            job.groupings,
            vec![
                ("stage".to_string(), "dev".to_string()),
                ("heroku_dyno_type".to_string(), "web.1".to_string()),
            ]
        );
    }

    #[test]
    fn test_job_with_app_name() {
        let job = PushJob::from_deployment(&deployment("prod", "worker.2", Some("shop")));

        assert_eq!(job.name, "shop worker.2");
        assert_eq!(job.groupings[0], ("heroku_app".to_string(), "shop".to_string()));
        assert_eq!(job.grouping(STAGE_LABEL), Some("prod"));
        assert_eq!(job.grouping(INSTANCE_LABEL), Some("worker.2"));
    }

    #[test]
    fn test_unknown_grouping() {
        let job = PushJob::from_deployment(&deployment("dev", "test", None));
        assert!(job.grouping(APP_LABEL).is_none());
    }
}
