pub mod cycles;
pub mod graph;
pub mod index;
pub mod job;
pub mod liveness;
pub mod rank;
pub mod reduce;
pub mod report;

pub use graph::{AdjacencyMatrix, Edge};
pub use index::VertexIndex;
pub use liveness::{HttpProber, LivenessCache, Prober};
pub use rank::RankMap;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
 _ _       _                      _
| (_)_ __ | | ___ __ __ _ _ __  | | __
| | | '_ \| |/ / '__/ _` | '_ \ | |/ /
| | | | | |   <| | | (_| | | | ||   <
|_|_|_| |_|_|\_\_|  \__,_|_| |_||_|\_\
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        format!("  linkrank v{} - crawl graph scoring", env!("CARGO_PKG_VERSION")).bright_white()
    );
    println!();
}
