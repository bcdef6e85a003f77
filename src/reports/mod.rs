// ===== forcegrade/src/reports/mod.rs =====
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use forcegrade::scorer::{EvaluationResult, OverlayShape};
use forcegrade::spec::TaskSpec;

pub fn print_task_list(tasks: &[TaskSpec]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Title"),
        Cell::new("Forces"),
        Cell::new("Relations"),
        Cell::new("Basis"),
    ]);

    for t in tasks {
        let names: Vec<&str> = t.expected_forces.iter().map(|f| f.name.as_str()).collect();
        table.add_row(vec![
            Cell::new(&t.id).add_attribute(Attribute::Bold),
            Cell::new(&t.title),
            Cell::new(names.join(", ")),
            Cell::new(t.relations.len().to_string()).set_alignment(CellAlignment::Right),
            Cell::new(t.basis.to_string()),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_task_detail(task: &TaskSpec) {
    println!("\nTask: {} ({})", task.title, task.id);
    for line in &task.help_lines {
        println!("  {}", line);
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Force").add_attribute(Attribute::Bold),
        Cell::new("Direction"),
        Cell::new("Anchors"),
        Cell::new("Aliases"),
    ]);
    for f in &task.expected_forces {
        let anchors: Vec<&str> = f
            .anchors
            .iter()
            .map(|a| if a.is_point() { "point" } else { "segment" })
            .collect();
        let aliases: Vec<&str> = f.aliases.iter().map(String::as_str).collect();
        table.add_row(vec![
            Cell::new(&f.name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.0}\u{b0}", f.dir_unit.heading_deg())),
            Cell::new(anchors.join(", ")),
            Cell::new(aliases.join(", ")),
        ]);
    }
    println!("{}", table);
}

fn score_cell(v: f32) -> Cell {
    let text = format!("{:.2}", v);
    if v >= 0.999 {
        Cell::new(text).fg(Color::Green)
    } else if v >= 0.5 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text).fg(Color::Red)
    }
}

pub fn print_evaluation(task: &TaskSpec, result: &EvaluationResult) {
    println!("\n\u{1F50E} === EVALUATION: {} === \u{1F50E}", task.id);

    // Summary
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Coverage"),
        Cell::new("Equilibrium"),
        Cell::new("Relations"),
    ]);
    table.add_row(vec![
        score_cell(result.score).add_attribute(Attribute::Bold),
        score_cell(result.coverage),
        score_cell(result.equilibrium_score),
        score_cell(result.relations_score),
    ]);
    println!("\n{}", table);

    // Per-force breakdown
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("Expected").add_attribute(Attribute::Bold),
        Cell::new("Drawn"),
        Cell::new("Name"),
        Cell::new("Dir"),
        Cell::new("Pos"),
        Cell::new("Combined").add_attribute(Attribute::Bold),
        Cell::new("Angle err"),
        Cell::new("Pos err"),
    ]);
    for i in 2..=7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    for (name, d) in &result.forces {
        if !d.found {
            table.add_row(vec![
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new("missing").fg(Color::Red),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ]);
            continue;
        }
        let drawn = if d.drawn_name.trim().is_empty() {
            Cell::new("(unnamed)").fg(Color::Yellow)
        } else {
            Cell::new(&d.drawn_name)
        };
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            drawn,
            score_cell(d.name_score),
            score_cell(d.dir_score),
            score_cell(d.pos_score),
            score_cell(d.combined).add_attribute(Attribute::Bold),
            Cell::new(
                d.angle_error_deg
                    .map(|e| format!("{:.1}\u{b0}", e))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                d.pos_error
                    .map(|e| format!("{:.1}", e))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("\n{}", table);

    if let Some(eq) = &result.equilibrium {
        println!(
            "Equilibrium: residual {:.1} ({:.1}, {:.1}), max force {:.1}, relative error {:.2}",
            eq.magnitude, eq.c1, eq.c2, eq.max_force, eq.relative_error
        );
    }
    for r in &result.relations {
        println!(
            "Relation: {:.1} / {:.1} = {:.2} (target {:.2}, error {:.2}, score {:.2})",
            r.lhs, r.rhs, r.ratio, r.target, r.error, r.score
        );
    }

    if !result.feedback.is_empty() {
        println!("\nFeedback:");
        for (i, line) in result.feedback.iter().enumerate() {
            let marker = match result.overlays.get(&i).map(Vec::len).unwrap_or(0) {
                0 => String::new(),
                n => format!("  [{} overlay{}]", n, if n == 1 { "" } else { "s" }),
            };
            println!("  {}. {}{}", i + 1, line, marker);
        }
    }

    let overlay_count: usize = result.overlays.values().map(Vec::len).sum();
    if overlay_count > 0 {
        println!("\nOverlays:");
        for (line, shapes) in &result.overlays {
            for s in shapes {
                let desc = match s {
                    OverlayShape::Circle { center, r_ok, .. } => {
                        format!("circle at ({:.0}, {:.0}) r {:.0}", center.x, center.y, r_ok)
                    }
                    OverlayShape::Stadium { a, b, r_ok, .. } => format!(
                        "stadium ({:.0}, {:.0})-({:.0}, {:.0}) r {:.0}",
                        a.x, a.y, b.x, b.y, r_ok
                    ),
                    OverlayShape::Wedge {
                        center, heading_deg, ..
                    } => format!(
                        "wedge at ({:.0}, {:.0}) heading {:.0}\u{b0}",
                        center.x, center.y, heading_deg
                    ),
                };
                println!("  line {}: {}", line + 1, desc);
            }
        }
    }
}
