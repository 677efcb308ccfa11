//! HTML fleet report rendering
//!
//! Renders the latest status of every machine as a single HTML table.
//! Row severity uses the same classification as the alerting path, so
//! the report never disagrees with the mails.

use chrono::{DateTime, Utc};

use crate::DriveStatus;
use crate::config::Thresholds;
use crate::policy::{Classification, classify};

pub fn html_report(statuses: &[DriveStatus], thresholds: &Thresholds) -> String {
    let rows: String = statuses
        .iter()
        .map(|status| {
            let row_class = match classify(
                status.min_space_gb(),
                thresholds.hard_gb,
                thresholds.soft_gb,
            ) {
                Classification::Critical => "danger",
                Classification::Warning => "warning",
                Classification::Healthy => "",
            };

            format!(
                r#"
                <tr class="{row_class}">
                  <td class="is-size-5">{machine}</td>
                  <td class="is-size-5">{c:.1}</td>
                  <td class="is-size-5">{d:.1}</td>
                  <td class="is-size-5">{last_alert}</td>
                  <td class="is-size-5">{updated}</td>
                </tr>"#,
                machine = status.machine,
                c = status.c_drive_space_gb,
                d = status.d_drive_space_gb,
                last_alert = format_date(status.last_alert_sent_at),
                updated = format_date(Some(status.reported_at)),
            )
        })
        .collect();

    format!(
        r#"<html>
  <head>
    <title>Drive Status Report</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@0.9.4/css/bulma.min.css">
  </head>
  <body>
    <section class="section">
      <div class="container">
        <h1 class="title is-2 mb-6">Drive Status Report</h1>
        <div class="box">
          <table class="table is-striped is-fullwidth">
            <thead>
              <tr>
                <th>Machine</th>
                <th>C Drive Space (GB)</th>
                <th>D Drive Space (GB)</th>
                <th>Last Alert Sent</th>
                <th>Last Updated</th>
              </tr>
            </thead>
            <tbody>{rows}
            </tbody>
          </table>
        </div>
        <p class="help mt-4">
          <span class="has-text-danger">&#9632;</span> Less than {hard} GB available
          <span class="ml-4 has-text-warning">&#9632;</span> Less than {soft} GB available
        </p>
      </div>
    </section>
  </body>
</html>"#,
        hard = thresholds.hard_gb,
        soft = thresholds.soft_gb,
    )
}

fn format_date(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%d.%m.%Y %H:%M").to_string(),
        None => String::new(),
    }
}
