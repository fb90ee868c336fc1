// Plan Renderer: week-by-week view of the current advice with completion
// state and a single expanded week.

pub mod handlers;
pub mod render;
pub mod view;

pub use render::render_plan_markdown;
pub use view::PlanView;
