//! Tour-file writing and CSV run logging.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::solution::Solution;

/// Render a solution in TSPLIB TOUR format: header lines, `TOUR_SECTION`,
/// one 1-based node index per line, then `-1` and `EOF` terminators.
pub fn format_tour(instance_name: &str, solution: &Solution) -> String {
    let mut out = String::new();

    out.push_str(&format!("NAME : {}.tour\n", instance_name));
    out.push_str(&format!("COMMENT : Length {:.2}\n", solution.cost));
    out.push_str("TYPE : TOUR\n");
    out.push_str(&format!("DIMENSION : {}\n", solution.tour.len()));
    out.push_str("TOUR_SECTION\n");
    for &node in &solution.tour {
        out.push_str(&format!("{}\n", node + 1));
    }
    out.push_str("-1\n");
    out.push_str("EOF\n");

    out
}

/// Write a solution to a `.tour` file.
pub fn write_tour_file<P: AsRef<Path>>(
    path: P,
    instance_name: &str,
    solution: &Solution,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(format_tour(instance_name, solution).as_bytes())
}

/// CSV log of costs across runs: one header row of the alpha values tried,
/// one data row per run with the resulting tour cost per alpha. Each row
/// carries a timestamp in its first column.
pub struct RunLog {
    alphas: Vec<f64>,
    rows: Vec<(String, Vec<f64>)>,
}

impl RunLog {
    pub fn new(alphas: Vec<f64>) -> Self {
        RunLog {
            alphas,
            rows: Vec::new(),
        }
    }

    /// Record one run: the best cost obtained for each alpha, in the same
    /// order as the header.
    pub fn add_run(&mut self, costs: Vec<f64>) {
        assert_eq!(
            costs.len(),
            self.alphas.len(),
            "run must report one cost per alpha"
        );
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.rows.push((timestamp, costs));
    }

    /// Export the log as CSV.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let mut header = vec!["timestamp".to_string()];
        header.extend(self.alphas.iter().map(|a| format!("{}", a)));
        writer.write_record(&header)?;

        for (timestamp, costs) in &self.rows {
            let mut record = vec![timestamp.clone()];
            record.extend(costs.iter().map(|c| format!("{:.2}", c)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
