//! List registry contents

use anyhow::Result;

use crate::Portfolio;

/// Print the post table in display order
pub fn run(portfolio: &Portfolio) -> Result<()> {
    println!("{} posts", portfolio.registry.len());
    for post in portfolio.registry.entries() {
        println!("{}  {}  {}", post.date, post.id, post.title);
    }
    Ok(())
}
