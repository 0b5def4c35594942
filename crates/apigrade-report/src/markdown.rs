use apigrade_core::types::{ScoreResult, SubmissionAnalysis};

use crate::ReportContext;

/// Syntax errors listed in the narrative; the record keeps all of them.
pub const MAX_LISTED_ERRORS: usize = 3;

fn yes_no(value: bool) -> &'static str {
    if value {
        "✅ Yes"
    } else {
        "❌ No"
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String], code: bool) {
    if items.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push('\n');
    for item in items {
        if code {
            out.push_str(&format!("- `{item}`\n"));
        } else {
            out.push_str(&format!("- {item}\n"));
        }
    }
    out.push('\n');
}

/// Format the evaluation narrative as Markdown.
pub fn format_report(
    ctx: &ReportContext<'_>,
    analysis: &SubmissionAnalysis,
    score: &ScoreResult,
) -> String {
    let mut out = String::new();
    let timestamp = ctx.display_timestamp();

    out.push_str(&format!(
        "# 🎯 Automated Evaluation - {course}\n\n\
         **Student:** {student}  \n\
         **Week:** {week}  \n\
         **Date:** {timestamp}  \n\n\
         ---\n\n\
         ## {glyph} Score: {points}/{max} points ({category})\n\n",
        course = ctx.course.name,
        student = ctx.student_name,
        week = ctx.week,
        glyph = score.category.glyph(),
        points = score.score,
        max = ctx.max_score,
        category = score.category,
    ));

    push_list(&mut out, "### ✅ Strengths", &score.feedback, false);
    push_list(&mut out, "### 🎯 Areas for Improvement", &score.improvements, false);

    out.push_str(&format_metrics(ctx, analysis));

    push_list(&mut out, "#### Endpoints found", &analysis.endpoints_found, true);
    push_list(&mut out, "#### Test files found", &analysis.test_files, true);

    let listed_errors: Vec<String> = analysis
        .syntax_errors
        .iter()
        .take(MAX_LISTED_ERRORS)
        .cloned()
        .collect();
    push_list(&mut out, "#### ⚠️ Errors detected", &listed_errors, false);

    out.push_str(&format_next_steps(ctx));
    out.push_str(&format_resources(ctx));

    out.push_str(&format!(
        "---\n\n\
         ## 🤖 Evaluation Details\n\n\
         - **System:** apigrade v{version}\n\
         - **Method:** static analysis + {framework} pattern validation\n\
         - **Criteria:** delivery, {framework} usage, endpoints, code volume\n\
         - **Generated:** {timestamp}\n",
        version = env!("CARGO_PKG_VERSION"),
        framework = ctx.framework,
    ));

    out
}

fn format_metrics(ctx: &ReportContext<'_>, analysis: &SubmissionAnalysis) -> String {
    format!(
        "### 📊 Technical Analysis\n\
         - **Files analyzed:** {}\n\
         - **Lines of code:** {}\n\
         - **Functions found:** {}\n\
         - **Classes found:** {}\n\
         - **{} detected:** {}\n\
         - **Endpoints implemented:** {}\n\n",
        analysis.files_analyzed.len(),
        analysis.total_lines,
        analysis.functions_count,
        analysis.classes_count,
        ctx.framework,
        yes_no(analysis.framework_usage),
        analysis.endpoints_found.len(),
    )
}

fn format_next_steps(ctx: &ReportContext<'_>) -> String {
    let next_week = ctx.week.next();
    if next_week <= ctx.course.total_weeks {
        format!(
            "### 📚 Next Steps for Week {next_week}\n\
             - Review the week {next_week} material in the main repository\n\
             - Apply the improvements suggested in this feedback\n\
             - Practice with the extra exercises when available\n\
             - Join the course discussions to resolve questions\n\n"
        )
    } else {
        format!(
            "### 🎓 Course Completed!\n\
             - Review the final feedback on your project\n\
             - Build your portfolio with every project you developed\n\
             - Congratulations on completing {}!\n\
             - Consider additional {} certifications\n\n",
            ctx.course.name, ctx.framework,
        )
    }
}

fn format_resources(ctx: &ReportContext<'_>) -> String {
    let mut out = String::from("### 📞 Support Resources\n");
    out.push_str(&format!("- **Main repository:** {}\n", ctx.course.repository));
    out.push_str(&format!("- **Week material:** `{}`\n", ctx.week_material_path()));
    out.push_str("- **Documentation:** `/_docs/`\n");
    out.push_str("- **Guides:** `/_docs/guides/`\n");
    if let Some(ref instructor) = ctx.course.instructor {
        out.push_str(&format!("- **Instructor:** {instructor}\n"));
    }
    if let Some(ref institution) = ctx.course.institution {
        out.push_str(&format!("- **Institution:** {institution}\n"));
    }

    out.push_str(&format!(
        "\n### 💡 General Tips\n\
         - Keep your code organized and commented\n\
         - Use descriptive names for variables and functions\n\
         - Handle errors in your endpoints\n\
         - Take advantage of the automatic documentation {} generates\n\
         - Write tests to improve code quality\n\n",
        ctx.framework,
    ));
    out
}

/// Format the diagnostic narrative used when no source files were found.
pub fn format_no_code_report(ctx: &ReportContext<'_>) -> String {
    let timestamp = ctx.display_timestamp();
    let extensions = ctx
        .file_extensions
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ");
    let week = ctx.week;
    let student = ctx.student_name;
    let framework = ctx.framework;

    let mut out = format!(
        "# ⚠️ No Code to Evaluate\n\n\
         **Student:** {student}  \n\
         **Week:** {week}  \n\
         **Date:** {timestamp}\n\n\
         ## Problem Detected\n\n\
         No source files ({extensions}) were found in your repository.\n\n"
    );

    out.push_str(&format!(
        "### 🔍 Check the following\n\n\
         1. **✅ File extension**\n   \
            - Your code must live in files ending in {extensions}\n   \
            - Avoid .txt or other formats\n\n\
         2. **✅ Location**\n   \
            - Files must be at the repository root or in regular folders\n   \
            - Not inside hidden or special folders\n\n\
         3. **✅ Branch**\n   \
            - Make sure you pushed to the right branch\n   \
            - The pull request must target the main branch\n\n\
         4. **✅ Repository permissions**\n   \
            - The repository must be public or grant access\n   \
            - Check that the webhook is working\n\n"
    ));

    out.push_str(&format!(
        "### 🚀 How to fix it\n\n\
         1. **Create a basic {framework} file:**\n\
         ```python\n\
         # main.py - starter for week {week}\n\
         from fastapi import FastAPI\n\
         \n\
         app = FastAPI(title=\"My API - Week {week}\")\n\
         \n\
         @app.get(\"/\")\n\
         def read_root():\n    \
             return {{\"message\": \"Hello from FastAPI!\"}}\n\
         \n\
         @app.get(\"/student\")\n\
         def get_student():\n    \
             return {{\"name\": \"{student}\", \"week\": {week}}}\n\
         ```\n\n\
         2. **Commit and push:**\n\
         ```bash\n\
         git add main.py\n\
         git commit -m \"Add week {week} starter code\"\n\
         git push origin week-{week}-submission\n\
         ```\n\n\
         3. **Check the pull request**\n   \
            - Confirm the PR was created\n   \
            - Check that your files show up on GitHub\n\n"
    ));

    out.push_str(&format!(
        "### 📞 Getting Help\n\n\
         - **Main repository:** {repository}\n\
         - **Reference material:** `{material}`\n\
         - **Setup docs:** `/_docs/setup/`\n\
         - **Repository issues:** for specific technical questions\n\n\
         ### 📋 Next Evaluation\n\n\
         Once these points are fixed, your code is evaluated again when:\n\
         - You push to your branch\n\
         - The evaluation is run manually\n\
         - The configured webhook fires\n\n\
         ---\n\n\
         🤖 *apigrade automatic evaluation - problem detection*  \n\
         📅 *Generated: {timestamp}*\n",
        repository = ctx.course.repository,
        material = ctx.week_material_path(),
    ));

    out
}
