use glucolog::app::App;

fn main() {
    let (app, cli) = match App::from_cli() {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = cli.cmd.run(&app) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
