use colored::Colorize;

use crate::driver::Report;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Text rendering of a report: a header naming the query, then one
    /// line per resolved type or member.
    pub fn render(&self, report: &Report) -> String {
        let mut output = self.format_header(report);
        output.push_str(" - ");
        output.push_str(&self.format_kind(report));

        if report.entries.is_empty() && !report.found {
            output.push_str(": nothing found");
            return output;
        }

        for entry in &report.entries {
            output.push_str("\n  ");
            output.push_str(entry);
        }
        if let Some(return_type) = &report.return_type {
            output.push_str("\n  ");
            output.push_str(&self.format_return_type(return_type));
        }
        output
    }

    fn format_header(&self, report: &Report) -> String {
        let mut header = report.receiver.clone();
        if let Some(name) = &report.name {
            header.push('.');
            header.push_str(name);
            if report.arity > 0 {
                header.push('<');
                for _ in 1..report.arity {
                    header.push(',');
                }
                header.push('>');
            }
            if report.invocation {
                header.push_str("(...)");
            }
        }

        if self.color {
            header.bold().to_string()
        } else {
            header
        }
    }

    fn format_kind(&self, report: &Report) -> String {
        let label = report.kind.as_str();
        if !self.color {
            return label.to_string();
        }

        if !report.found {
            label.red().bold().to_string()
        } else if report.ambiguous {
            label.yellow().bold().to_string()
        } else {
            label.green().bold().to_string()
        }
    }

    fn format_return_type(&self, return_type: &str) -> String {
        let label = format!("-> {return_type}");
        if self.color {
            label.cyan().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;
