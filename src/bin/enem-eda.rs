use std::process;

use enem_eda::{builtin, cli, Explorer};

fn main() {
    let args = cli::parse_args();
    let analyses = builtin::analyses();

    let explorer = match Explorer::default().configure_from_args(&args) {
        Ok(explorer) => explorer,
        Err(e) => {
            eprintln!("enem-eda: {}", e);
            process::exit(1);
        }
    };

    if args.list {
        explorer.list(&analyses);
        return;
    }

    let input = match &args.input {
        Some(input) => input,
        None => {
            eprintln!("enem-eda: no input file given");
            process::exit(1);
        }
    };

    if let Err(e) = explorer.run_all(input, &analyses) {
        eprintln!("enem-eda: {}", e);
        process::exit(1);
    }
}
