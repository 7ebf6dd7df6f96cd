//! Aggregate statistics over blog lists.

use std::collections::HashMap;

use crate::models::blog::Blog;

/// Sum of likes across all blogs.
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().map(|b| b.likes).sum()
}

/// The blog with the most likes. Ties resolve to the later entry.
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    blogs.iter().max_by_key(|b| b.likes)
}

/// The author with the most blogs, with that count.
/// Blogs without an author are skipped.
pub fn most_blogs(blogs: &[Blog]) -> Option<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for blog in blogs {
        if let Some(author) = blog.author.as_deref() {
            *counts.entry(author).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(author, count)| (author.to_string(), count))
}

/// The author whose blogs have the most likes in total, with that total.
pub fn most_likes(blogs: &[Blog]) -> Option<(String, i64)> {
    let mut likes: HashMap<&str, i64> = HashMap::new();
    for blog in blogs {
        if let Some(author) = blog.author.as_deref() {
            *likes.entry(author).or_insert(0) += blog.likes;
        }
    }
    likes
        .into_iter()
        .max_by_key(|&(_, total)| total)
        .map(|(author, total)| (author.to_string(), total))
}
