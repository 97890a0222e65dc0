use tracing::info;
use tracing_subscriber;

use clap::{values_t, App, Arg};

use zfx_seed::server::{node, Settings};
use zfx_seed::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_level(false)
        .with_target(false)
        .without_time()
        .compact()
        .with_max_level(tracing::Level::INFO)
        .init();

    let matches = App::new("zfx-seed")
        .version("0.1")
        .author("zero.fx labs ltd.")
        .about("Runs a node which seeds its peer addresses from well-known seed nodes")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("CONFIG_FILE")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("listener-ip")
                .short("a")
                .long("listener-ip")
                .value_name("LISTENER_IP")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .value_name("HOST:PORT")
                .multiple(true),
        )
        .get_matches();

    let mut settings = Settings::new(matches.value_of("config"))?;
    if let Some(listener_ip) = matches.value_of("listener-ip") {
        settings.listener_ip = listener_ip.to_string();
    }
    if matches.is_present("seed") {
        settings.seeds = values_t!(matches.values_of("seed"), String).unwrap_or_else(|e| e.exit());
    }

    let sys = actix::System::new();
    sys.block_on(async move {
        if let Err(err) = node::run(settings) {
            tracing::error!("{:?}", err);
            actix::System::current().stop();
            return;
        }

        let sig = if cfg!(unix) {
            use futures::future::FutureExt;
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigint = signal(SignalKind::interrupt()).unwrap();
            let mut sigterm = signal(SignalKind::terminate()).unwrap();

            futures::select! {
                _ = sigint.recv().fuse() => "SIGINT",
                _ = sigterm.recv().fuse() => "SIGTERM"
            }
        } else {
            tokio::signal::ctrl_c().await.unwrap();
            "Ctrl+C"
        };
        info!(target: "zfx-seed", "Got {}, stopping...", sig);

        actix::System::current().stop();
    });
    sys.run()?;

    Ok(())
}
