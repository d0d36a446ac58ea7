//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::application::views::{ContentElement, ElementKind, EnrollmentGroupingView};
use crate::domain::{AdjustedGrouping, AdjustedNode, AdjustedUnit};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

// ============================================================
// Adjusted content rendering
// ============================================================

/// Conversion of adjusted content into a printable tree.
pub trait ToTree {
    fn to_tree(&self) -> Tree<String>;
}

impl ToTree for AdjustedGrouping {
    fn to_tree(&self) -> Tree<String> {
        let root = format!("{} {}", self.code.bold(), self.full_title);
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|child| match child {
                AdjustedNode::Grouping(grouping) => grouping.to_tree(),
                AdjustedNode::Unit(unit) => Tree::new(unit_label(unit)),
            })
            .collect();
        Tree::new(root).with_leaves(leaves)
    }
}

impl ToTree for EnrollmentGroupingView {
    fn to_tree(&self) -> Tree<String> {
        let mut tree = Tree::new(format!("{} {}", self.code.bold(), self.full_title));
        for unit in &self.units {
            let marker = if unit.added { " +".green().to_string() } else { String::new() };
            let optional = if unit.mandatory { "" } else { " (optional)" };
            tree.push(Tree::new(format!(
                "{} bloc {} {}{}{}",
                unit.code, unit.block, unit.title, optional, marker
            )));
        }
        for sub in &self.subprogram {
            tree.push(sub.to_tree());
        }
        tree
    }
}

fn unit_label(adjusted: &AdjustedUnit) -> String {
    let unit = &adjusted.unit;
    let mut label = format!("{} bloc {} {}", unit.code, unit.block, unit.full_title);
    if adjusted.added {
        label.push_str(&format!(" {}", "(added)".green()));
    }
    if adjusted.modified {
        label.push_str(&format!(
            " {}",
            format!("(bloc {} in catalog)", adjusted.catalog_block).yellow()
        ));
    }
    label
}

/// One content row: marker, code, block, quarter, credits, volumes, title.
pub fn content_row(element: &ContentElement) {
    let marker = if element.added {
        "+".green().to_string()
    } else if element.modified {
        "~".yellow().to_string()
    } else {
        " ".to_string()
    };
    match element.kind {
        ElementKind::Grouping => println!(
            "{} {:<10} {}",
            marker,
            element.code.bold(),
            element.full_title
        ),
        ElementKind::Unit => println!(
            "{} {:<10} {:>2} {:<8} {:>6} {:>8} {}",
            marker,
            element.code,
            element.block,
            element.quarter,
            element.credits,
            element.volumes,
            element.full_title
        ),
    }
}
