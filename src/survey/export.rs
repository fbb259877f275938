// Outputs of a survey: the CSV export and the terminal views.

use std::fs;

use crate::survey::*;

const EXPORT_HEADER: [&str; 5] = ["Rank", "Hazard Code", "Hazard Name", "Score", "Band"];

/// The ranking as CSV, every hazard included. The exposure column is only
/// present when the exposure axis is available.
pub fn export_csv(ranking: &Ranking) -> BSurveyResult<String> {
    let with_exposure = ranking.exposure_available();
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);

    let mut header: Vec<String> = EXPORT_HEADER.iter().map(|s| s.to_string()).collect();
    if with_exposure {
        let metric = ranking.exposure_metric.clone().unwrap_or_default();
        header.push(format!("Exposure({})", metric));
    }
    wtr.write_record(&header).context(CsvWriteSnafu {})?;

    for (idx, sh) in ranking.hazards.iter().enumerate() {
        let mut record: Vec<String> = vec![
            (idx + 1).to_string(),
            sh.hazard.code.clone(),
            sh.hazard.name.clone(),
            sh.normalised.to_string(),
            sh.band.to_string(),
        ];
        if with_exposure {
            record.push(sh.exposure_raw.map(|x| x.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record).context(CsvWriteSnafu {})?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context(WritingOutputSnafu { path: "CSV export" })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes to a file, or to the standard output for the path `stdout`.
pub fn write_output(path: &str, content: &str) -> BSurveyResult<()> {
    if path == "stdout" {
        println!("{}", content);
    } else {
        fs::write(path, content).context(WritingOutputSnafu { path })?;
        info!("Written {}", path);
    }
    Ok(())
}

fn exposure_cell(x: Option<f64>) -> String {
    x.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "-".to_string())
}

pub fn print_ranking(ranking: &Ranking, top: usize) {
    let shown = ranking.hazards.len().min(top);
    println!(
        "Profile: {}  Exposure: {}",
        ranking.profile,
        match (&ranking.exposure_metric, ranking.exposure_available()) {
            (Some(m), true) => m.clone(),
            _ => "not available".to_string(),
        }
    );
    println!(
        "{:>4}  {:<10} {:<32} {:>5}  {:<6} {:>8}",
        "Rank", "Code", "Hazard", "Score", "Band", "Exposure"
    );
    for (idx, sh) in ranking.hazards.iter().take(shown).enumerate() {
        println!(
            "{:>4}  {:<10} {:<32} {:>5}  {:<6} {:>8}",
            idx + 1,
            sh.hazard.code,
            sh.hazard.name,
            sh.normalised,
            sh.band.as_str(),
            exposure_cell(sh.exposure_norm)
        );
    }
    if shown < ranking.hazards.len() {
        println!("... {} more hazards", ranking.hazards.len() - shown);
    }
}

pub fn print_explain(hazard_code: &str, lines: &[Contribution]) {
    println!("Why {} is ranked here:", hazard_code);
    if lines.is_empty() {
        println!("  no expert opinion for this hazard");
        return;
    }
    for c in lines.iter() {
        println!(
            "  {:>4} = {} x {} ({})  [{}] {} {}",
            c.contribution,
            c.user_importance,
            c.priority,
            c.letter,
            c.category,
            c.attribute_id,
            c.attribute_text
        );
    }
}

pub fn print_profiles(profiles: &ProfileCatalogue, exposure_metrics: &[String]) {
    println!("Profiles:");
    for p in profiles.profiles().iter() {
        println!("  {:<10} {}: {}", p.key, p.label, p.description);
    }
    if exposure_metrics.is_empty() {
        println!("Exposure metrics: none");
    } else {
        println!("Exposure metrics: {}", exposure_metrics.join(", "));
    }
}
