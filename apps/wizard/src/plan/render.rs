use super::view::PlanView;

/// Renders the plan as markdown. Each week is a `<details>` block; only the
/// expanded week carries `open`.
pub fn render_plan_markdown(plan: &PlanView) -> String {
    let mut md = String::from("# Your Learning Roadmap\n\n");

    md.push_str(&format!(
        "**Progress:** {}/{} weeks ({}%)\n",
        plan.progress.completed, plan.progress.total, plan.progress.display_percent
    ));
    if let Some(score) = plan.role_fit_score {
        md.push_str(&format!("**Role fit:** {score}/100\n"));
    }
    md.push('\n');

    push_list(&mut md, "Skill Gaps", &plan.identified_skill_gaps);
    push_list(
        &mut md,
        "Suggested Portfolio Projects",
        &plan.suggested_portfolio_projects,
    );

    md.push_str("## Weekly Plan\n\n");
    for week in &plan.weeks {
        let open = if week.expanded { " open" } else { "" };
        let check = if week.completed { "x" } else { " " };
        md.push_str(&format!("<details{open}>\n"));
        md.push_str(&format!(
            "<summary>[{check}] Week {}: {}</summary>\n\n",
            week.week, week.topic
        ));
        if !week.learning_objectives.is_empty() {
            md.push_str("**Objectives**\n\n");
            for objective in &week.learning_objectives {
                md.push_str(&format!("- {objective}\n"));
            }
            md.push('\n');
        }
        if !week.project_idea.is_empty() {
            md.push_str(&format!("**Project:** {}\n\n", week.project_idea));
        }
        if !week.resources.is_empty() {
            md.push_str("**Resources**\n\n");
            for resource in &week.resources {
                md.push_str(&format!("- [{}]({})\n", resource.title, resource.url));
            }
            md.push('\n');
        }
        md.push_str("</details>\n\n");
    }
    md
}

fn push_list(md: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("## {title}\n\n"));
    for item in items {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}
