//! Prompt templates per task kind
//!
//! Everything here is pure: the same kind, project name and bundle always
//! produce the same prompt text.

use crate::app::TaskKind;
use crate::project::ContextBundle;
use crate::utils::text::template::SimpleTemplate;

/// System prompt plus the pieces of the user prompt for one task kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub kind: TaskKind,
    system: &'static str,
    intro: &'static str,
    dimensions: &'static [&'static str],
    closing: &'static str,
}

/// Look up the template for a task kind
pub fn template_for(kind: TaskKind) -> PromptTemplate {
    match kind {
        TaskKind::FullAnalysis => PromptTemplate {
            kind,
            system: "You are an elite software architect and security expert analyzing the {{project}} codebase. \
                     Be precise and technical, and cite specific files, line numbers or code examples where relevant.",
            intro: "Analyze the {{project}} codebase.",
            dimensions: &[
                "Architecture quality and patterns",
                "Security implementation",
                "Performance optimizations",
                "Code quality and maintainability",
                "Potential vulnerabilities or issues",
                "Specific actionable recommendations",
            ],
            closing: "Provide a detailed technical analysis with specific recommendations for improvements.",
        },
        TaskKind::SecurityAudit => PromptTemplate {
            kind,
            system: "You are a cybersecurity expert performing a security audit of the {{project}} codebase. \
                     Provide specific, actionable security recommendations.",
            intro: "Perform a security audit on these {{project}} files.",
            dimensions: &[
                "HTTPS implementation and enforcement",
                "Content Security Policy (CSP) configuration",
                "XSS and injection vulnerabilities",
                "Authentication and authorization",
                "Input validation and sanitization",
                "Secure coding practices",
            ],
            closing: "Identify vulnerabilities and provide specific fixes.",
        },
        TaskKind::PerformanceAudit => PromptTemplate {
            kind,
            system: "You are a web performance optimization expert reviewing the {{project}} codebase. \
                     Focus on measurable improvements.",
            intro: "Analyze performance optimization opportunities for {{project}}.",
            dimensions: &[
                "Bundle size optimization",
                "Lazy loading implementation",
                "Critical resource prioritization",
                "Caching strategies",
                "Code splitting opportunities",
                "Web Vitals improvements (LCP, FID, CLS)",
            ],
            closing: "Suggest specific optimizations with their expected impact.",
        },
        TaskKind::CodeReview => PromptTemplate {
            kind,
            system: "You are a senior code reviewer working on the {{project}} codebase. \
                     Be thorough but concise, and show code examples for improvements.",
            intro: "Review this code file from {{project}}.",
            dimensions: &[
                "Code quality and readability",
                "Best practices adherence",
                "Potential bugs or issues",
                "Performance implications",
                "Security considerations",
                "Maintainability improvements",
            ],
            closing: "Provide a detailed code review with specific recommendations.",
        },
        TaskKind::FeatureSuggestions => PromptTemplate {
            kind,
            system: "You are a product strategist and UX expert. Based on the {{project}} codebase, \
                     suggest specific, implementable features with technical details.",
            intro: "Based on the {{project}} project structure, suggest innovative features and improvements.",
            dimensions: &[
                "Enhanced user experience",
                "Improved conversion rates",
                "Competitive advantages",
                "Modern web technologies",
                "Accessibility and inclusivity",
            ],
            closing: "Explain how each suggestion would be implemented in this project.",
        },
        TaskKind::GenericChat => PromptTemplate {
            kind,
            system: "You are an expert software engineer familiar with the {{project}} codebase. \
                     Provide helpful, specific and actionable advice on web development, JavaScript, \
                     HTML, CSS, security, performance and best practices.",
            intro: "Question about the {{project}} project:",
            dimensions: &[],
            closing: "",
        },
    }
}

impl PromptTemplate {
    pub fn system_prompt(&self, project: &str) -> String {
        render(self.system, project)
    }

    /// User prompt embedding the bundle and the required dimensions
    pub fn user_prompt(&self, project: &str, bundle: &ContextBundle) -> String {
        let mut prompt = render(self.intro, project);
        prompt.push_str("\n\n");

        if let Some(summary) = &bundle.summary {
            prompt.push_str(&render_summary(summary));
            prompt.push('\n');
        }

        prompt.push_str(&render_files(bundle));

        if !self.dimensions.is_empty() {
            prompt.push_str("\nCover the following:\n");
            for (i, dimension) in self.dimensions.iter().enumerate() {
                prompt.push_str(&format!("{}. {}\n", i + 1, dimension));
            }
        }

        if !self.closing.is_empty() {
            prompt.push('\n');
            prompt.push_str(self.closing);
        }

        prompt
    }

    /// User prompt for a free-form question; no file context
    pub fn chat_prompt(&self, project: &str, question: &str) -> String {
        format!("{} {}", render(self.intro, project), question)
    }
}

fn render(template: &str, project: &str) -> String {
    let mut engine = SimpleTemplate::new();
    engine.set("project", project);
    engine.render(template)
}

fn render_summary(summary: &crate::project::ProjectSummary) -> String {
    let mut out = String::from("PROJECT SUMMARY:\n");
    out.push_str(&format!("Project: {}\n", summary.project_name));
    out.push_str(&format!("Total files: {}\n", summary.total_files));
    out.push_str("Files per category:\n");
    for (category, count) in &summary.category_counts {
        out.push_str(&format!("- {}: {}\n", category, count));
    }

    out.push_str("\nFILE STRUCTURE:\n");
    for (category, files) in &summary.structure {
        if files.is_empty() {
            continue;
        }
        out.push_str(&format!("[{}]\n", category));
        for file in files {
            out.push_str(&format!("- {}\n", file));
        }
        let listed = summary.category_counts.get(category).copied().unwrap_or(0);
        if listed > files.len() {
            out.push_str(&format!("- ... {} more\n", listed - files.len()));
        }
    }
    out
}

/// Serialize bundle entries as delimited file blocks
pub fn render_files(bundle: &ContextBundle) -> String {
    let mut out = String::from("FILES:\n");
    if bundle.is_empty() {
        out.push_str("(no matching files found)\n");
        return out;
    }

    for entry in &bundle.entries {
        let note = if entry.truncated {
            " (truncated)"
        } else if !entry.is_readable() {
            " (unreadable)"
        } else {
            ""
        };
        out.push_str(&format!("=== FILE: {}{} ===\n", entry.path, note));
        out.push_str(&entry.content);
        if !entry.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("=== END FILE: {} ===\n", entry.path));
    }
    out
}
