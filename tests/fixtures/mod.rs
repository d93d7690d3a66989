//! Upstream records shaped the way the console service reports them
#![allow(dead_code)]

use serde_json::{json, Value};

/// `jobs` array for `GET /api/jobs`, covering each way status is reported.
pub fn job_list() -> Value {
    json!({
        "jobs": [
            {
                "name": "api-service",
                "job_type": "freestyle",
                "url": "http://jenkins.local/job/api-service/",
                "color": "red",
                "result": "SUCCESS",
                "building": false,
                "timestamp": 1_700_000_000_000_i64,
                "duration": 42_000
            },
            {
                "name": "nightly",
                "job_type": "pipeline",
                "color": "blue_anime",
                "building": true
            },
            {
                "name": "team-folder",
                "job_type": "folder",
                "color": "grey"
            },
            {
                "name": "legacy-matrix",
                "_class": "hudson.matrix.MatrixProject"
            },
            {
                "name": "mystery",
                "job_type": "something-new",
                "status": "queued"
            }
        ]
    })
}

/// `GET /api/job/{name}/config` body for a freestyle job using git.
pub fn freestyle_git_config() -> Value {
    json!({
        "job_type": "freestyle",
        "config": {
            "name": "api-service",
            "job_type": "freestyle",
            "description": "Builds the API",
            "disabled": false,
            "scm_type": "git",
            "repository_url": "https://github.com/acme/api.git",
            "branch_specifier": "*/main",
            "behaviours": ["clean-checkout"],
            "build_steps": "make test"
        }
    })
}

/// `GET /api/job/{name}/config` body for a disabled inline-script pipeline.
pub fn pipeline_config() -> Value {
    json!({
        "job_type": "pipeline",
        "config": {
            "name": "nightly",
            "disabled": true,
            "pipeline_definition_type": "script",
            "pipeline_script": "pipeline { agent any }"
        }
    })
}

/// `GET /api/statistics` body.
pub fn statistics() -> Value {
    json!({
        "statistics": {
            "total_jobs": 5,
            "total_nodes": 2,
            "total_plugins": 80,
            "queue_size": 1,
            "jenkins_version": "2.440.1",
            "uptime": 123456
        }
    })
}

/// `GET /api/plugins` body: git enabled, credentials installed but disabled.
pub fn plugin_list() -> Value {
    json!({
        "plugins": [
            { "shortName": "git", "longName": "Git plugin", "enabled": true, "version": "5.2.1" },
            { "shortName": "credentials", "longName": "Credentials Plugin", "enabled": false },
            { "shortName": "cloudbees-folder", "enabled": true }
        ]
    })
}

/// `GET /api/job/{name}/builds` body. Every build carries the job's colour.
pub fn build_history() -> Value {
    json!({
        "builds": [
            {
                "number": 12,
                "result": null,
                "building": true,
                "color": "red_anime",
                "displayName": "#12",
                "queueId": 301
            },
            {
                "number": 11,
                "result": "SUCCESS",
                "building": false,
                "color": "red_anime",
                "timestamp": 1_700_000_000_000_i64,
                "duration": 30_000,
                "displayName": "#11"
            },
            {
                "number": 10,
                "result": "ABORTED",
                "building": false,
                "color": "red_anime"
            },
            {
                "number": 9,
                "url": "http://jenkins.local/job/api-service/9/"
            }
        ]
    })
}
