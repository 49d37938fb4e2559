use clinicdesk::{Config, run};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let worker_threads = config.general.worker_threads;

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all();
    if worker_threads > 0 {
        runtime.worker_threads(worker_threads);
    }

    runtime.build()?.block_on(run(config))
}
