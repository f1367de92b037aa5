pub mod chats;
pub mod export;
pub mod extract;
pub mod patch;
pub mod pools;
pub mod sql;
pub mod upload;

/// Width of the `=` rules framing every banner
pub const RULE_WIDTH: usize = 70;

pub fn rule() -> String {
  "=".repeat(RULE_WIDTH)
}

/// Title framed by rules, as printed at the start and end of each run
pub fn print_banner(title: &str) {
  println!("\n{}", rule());
  println!("{}", title);
  println!("{}\n", rule());
}
