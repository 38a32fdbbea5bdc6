use agrofuzzy::{
    GrowthModel, InferenceFlags, InferenceTrace, LinguisticVariable, OutputSetTrace, ScanReport, Universe,
};
use std::time::Duration;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Widest bar in the output-set chart.
const BAR_WIDTH: usize = 40;
/// Rows in the output-set chart; longer universes are subsampled.
const MAX_CHART_ROWS: usize = 31;
/// Columns in an input-term sparkline.
const MAX_SPARK_COLUMNS: usize = 51;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn print_scan(report: &ScanReport, model: &GrowthModel, elapsed: Duration, plot: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    let total = report.scored.len() + report.rejected.len();
    let title = format!("⚙  Scanning {} month(s) for {}", total, model.names().growth);
    println!("\n{}", palette.bold(palette.paint(title, ansi::CYAN)));
    println!("{}", palette.dim(format!("   rainfall scale factor: {}", model.rainfall_scale_factor())));

    println!("\n{}", palette.paint("━━━ Scores ━━━", ansi::GRAY));
    for scored in &report.scored {
        let is_best = scored.index == report.best.index;
        let marker = if is_best { palette.paint("★", ansi::GREEN) } else { " ".to_string() };
        let value = format!("{:>7.3}", scored.score.value);
        let value = if is_best { palette.bold(palette.paint(value, ansi::GREEN)) } else { value };
        println!(
            "  {} {} {} {}  {} {}{}",
            marker,
            palette.paint(format!("[{:>2}]", scored.index), ansi::GRAY),
            palette.paint(format!("{:<12}", month_label(&scored.record)), ansi::BLUE),
            value,
            palette.dim(format!(
                "rain {:>7.1} → {:>5.2}",
                scored.record.rainfall,
                model.scaled_rainfall(&scored.record)
            )),
            palette.dim(format!("temp {:>5.1}", scored.record.avg_temperature)),
            if scored.score.undefined { palette.paint("  (no rule fired)", ansi::YELLOW) } else { String::new() },
        );
    }

    if !report.rejected.is_empty() {
        println!("\n{}", palette.paint("━━━ Rejected ━━━", ansi::GRAY));
        for rejected in &report.rejected {
            println!(
                "  {} {} {}",
                palette.paint(format!("[{:>2}]", rejected.index), ansi::GRAY),
                palette.paint(format!("{:<12}", month_label(&rejected.record)), ansi::BLUE),
                palette.paint(rejected.error.to_string(), ansi::RED),
            );
        }
    }

    println!("\n{}", palette.paint("━━━ Best month ━━━", ansi::GRAY));
    match report.best_record() {
        Some(best) => {
            println!(
                "  {} {} {}",
                palette.bold(palette.paint(month_label(&best.record), ansi::GREEN)),
                palette.dim("│ growth:"),
                palette.bold(format!("{:.3}", best.score.value)),
            );
            if plot {
                let rainfall = model.scaled_rainfall(&best.record);
                let temperature = best.record.avg_temperature;
                if let Ok(trace) = model.evaluate_verbose(rainfall, temperature) {
                    print_input_terms(model, rainfall, temperature, &palette);
                    print_output_sets(&trace, &palette);
                }
            }
        }
        None => println!("{}", palette.dim("  No month selected")),
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", elapsed), ansi::GREEN));
    println!();
}

pub fn print_eval(trace: &InferenceTrace, model: &GrowthModel, inputs: (f64, f64), plot: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint("⚙  Fuzzy inference", ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Fuzzified inputs ━━━", ansi::GRAY));
    for (variable, terms) in &trace.fuzzified {
        let degrees: Vec<String> = terms
            .iter()
            .map(|(term, degree)| {
                let text = format!("{term}={degree:.3}");
                if *degree > 0.0 { palette.paint(text, ansi::YELLOW) } else { palette.dim(text) }
            })
            .collect();
        println!("  {} {}", palette.paint(format!("{variable:<14}"), ansi::BLUE), degrees.join("  "));
    }

    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    for firing in &trace.firings {
        let strength = format!("{:.3}", firing.strength);
        let strength =
            if firing.strength > 0.0 { palette.paint(strength, ansi::GREEN) } else { palette.dim(strength) };
        println!(
            "  {} {} {}",
            strength,
            palette.paint(format!("{:<24}", firing.rule), ansi::CYAN),
            palette.dim(format!("→ {}", firing.consequent)),
        );
    }

    println!("\n{}", palette.paint("━━━ Outputs ━━━", ansi::GRAY));
    for (variable, output) in &trace.inference.outputs {
        let note =
            if output.undefined { palette.paint("  (undefined: no rule fired)", ansi::YELLOW) } else { String::new() };
        println!(
            "  {} {}{}",
            palette.paint(format!("{variable:<14}"), ansi::BLUE),
            palette.bold(palette.paint(format!("{:.3}", output.value), ansi::GREEN)),
            note
        );
    }
    if trace.inference.flags.contains(InferenceFlags::INPUT_OUTSIDE_UNIVERSE) {
        println!("  {}", palette.paint("note: an input lies outside its universe", ansi::YELLOW));
    }

    if plot {
        let (rainfall, temperature) = inputs;
        print_input_terms(model, rainfall, temperature, &palette);
        print_output_sets(trace, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let m = &trace.metrics;
    println!(
        "  Total: {}  │  Fuzzify: {}  │  Rules: {}  │  Aggregate: {}  │  Defuzzify: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.dim(format!("{:?}", m.fuzzify)),
        palette.dim(format!("{:?}", m.rules)),
        palette.dim(format!("{:?}", m.aggregate)),
        palette.dim(format!("{:?}", m.defuzzify)),
    );
    println!();
}

fn print_input_terms(model: &GrowthModel, rainfall: f64, temperature: f64, palette: &ansi::Palette) {
    let names = model.names();
    for (name, x) in [(&names.rainfall, rainfall), (&names.temperature, temperature)] {
        if let Some(variable) = model.engine().variable(name) {
            print_input_chart(variable, x, palette);
        }
    }
}

/// One sparkline per term, with the crisp input marked underneath.
fn print_input_chart(variable: &LinguisticVariable, x: f64, palette: &ansi::Palette) {
    let universe = variable.universe();
    let width = universe.len().min(MAX_SPARK_COLUMNS);
    println!("\n{}", palette.paint(format!("━━━ Input: {} = {x:.2} ━━━", variable.name()), ansi::GRAY));

    for (term, triangle) in variable.terms() {
        let mu = triangle.degree(x);
        let line = sparkline(&triangle.sample(universe), width);
        let line = if mu > 0.0 { palette.paint(line, ansi::YELLOW) } else { palette.dim(line) };
        let term = palette.paint(format!("{term:<10}"), ansi::BLUE);
        println!("  {} │{}│ {}", term, line, palette.dim(format!("{mu:.2}")));
    }

    let marker = match marker_column(universe, x, width) {
        Some(col) => palette.paint(format!("{}▲", " ".repeat(col)), ansi::GREEN),
        None => palette.paint("(outside universe)", ansi::YELLOW),
    };
    println!("  {:<10}  {}", "", marker);

    let (lo, hi) = (format!("{:.1}", universe.lo()), format!("{:.1}", universe.hi()));
    let gap = width.saturating_sub(lo.len() + hi.len());
    println!("  {:<10}  {}", "", palette.dim(format!("{lo}{}{hi}", " ".repeat(gap))));
}

/// Resample `curve` to `width` columns of block characters; zero is blank.
fn sparkline(curve: &[f64], width: usize) -> String {
    if curve.is_empty() || width == 0 {
        return String::new();
    }
    (0..width)
        .map(|col| {
            let idx = if width == 1 { 0 } else { (col * (curve.len() - 1) + (width - 1) / 2) / (width - 1) };
            let mu = curve[idx];
            if mu <= 0.0 {
                ' '
            } else {
                let level = (mu * SPARK_LEVELS.len() as f64).ceil() as usize;
                SPARK_LEVELS[level.clamp(1, SPARK_LEVELS.len()) - 1]
            }
        })
        .collect()
}

/// Column of `x` in a `width`-column rendering of `universe`.
fn marker_column(universe: &Universe, x: f64, width: usize) -> Option<usize> {
    if !universe.contains(x) || width == 0 {
        return None;
    }
    let span = universe.hi() - universe.lo();
    Some((((x - universe.lo()) / span) * (width - 1) as f64).round() as usize)
}

fn print_output_sets(trace: &InferenceTrace, palette: &ansi::Palette) {
    for (variable, set) in &trace.output_sets {
        let crisp = trace.inference.output(variable).map(|o| o.value);
        println!("\n{}", palette.paint(format!("━━━ Aggregated set: {variable} ━━━"), ansi::GRAY));
        print_chart(set, crisp, palette);
    }
}

fn print_chart(set: &OutputSetTrace, crisp: Option<f64>, palette: &ansi::Palette) {
    let stride = set.points.len().div_ceil(MAX_CHART_ROWS).max(1);
    let half_step = set.points.get(1).zip(set.points.first()).map_or(0.0, |(b, a)| (b - a) * stride as f64 / 2.0);

    for (x, mu) in set.points.iter().zip(&set.aggregated).step_by(stride) {
        let bar = "█".repeat((mu * BAR_WIDTH as f64).round() as usize);
        let at_crisp = crisp.is_some_and(|c| (c - x).abs() <= half_step);
        let label = format!("{x:>7.2}");
        let label = if at_crisp { palette.bold(palette.paint(label, ansi::GREEN)) } else { palette.dim(label) };
        println!("  {} │{} {}", label, palette.paint(bar, ansi::CYAN), palette.dim(format!("{mu:.2}")));
    }
}

fn month_label(record: &agrofuzzy::InferenceRecord) -> String {
    match record.calendar_month() {
        Some(month) if month.name() != record.month => format!("{} ({})", record.month, &month.name()[..3]),
        _ => record.month.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrofuzzy::Triangle;

    #[test]
    fn sparkline_follows_the_curve() {
        let universe = Universe::new(0.0, 4.0, 1.0).unwrap();
        let curve = Triangle::new(0.0, 2.0, 4.0).unwrap().sample(&universe);
        assert_eq!(sparkline(&curve, 5), " ▄█▄ ");
        assert_eq!(sparkline(&[], 5), "");
    }

    #[test]
    fn sparkline_subsamples_long_curves() {
        let curve: Vec<f64> = (0..=100).map(|i| f64::from(i) / 100.0).collect();
        let line = sparkline(&curve, 11);
        assert_eq!(line.chars().count(), 11);
        assert_eq!(line.chars().next(), Some(' '));
        assert_eq!(line.chars().last(), Some('█'));
    }

    #[test]
    fn marker_tracks_the_input() {
        let universe = Universe::new(0.0, 50.0, 1.0).unwrap();
        assert_eq!(marker_column(&universe, 0.0, 51), Some(0));
        assert_eq!(marker_column(&universe, 25.0, 51), Some(25));
        assert_eq!(marker_column(&universe, 50.0, 51), Some(50));
        assert_eq!(marker_column(&universe, 60.0, 51), None);
    }
}
