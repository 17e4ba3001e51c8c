use chained_hashmap::top_words_in_file;
use std::process::ExitCode;

const DEFAULT_COUNT: usize = 10;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: top_words <path> [count]");
        return ExitCode::FAILURE;
    };
    let count = match args.next().map(|s| s.parse::<usize>()) {
        None => DEFAULT_COUNT,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("invalid count: {e}");
            return ExitCode::FAILURE;
        }
    };

    match top_words_in_file(&path, count) {
        Ok(top) => {
            for (word, n) in top {
                println!("{word} {n}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{path}: {e}");
            ExitCode::FAILURE
        }
    }
}
