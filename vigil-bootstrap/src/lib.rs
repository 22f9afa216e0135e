pub mod context;
pub mod scenario;

pub use context::AppContext;

pub fn run() -> anyhow::Result<()> {
    scenario::run_demo()
}
