use git2::{Oid, Repository, Sort};

use crate::log_debug;

/// A tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub commit_hash: String,
}

/// Finds the most recent tag reachable from HEAD, optionally restricted to a glob.
///
/// "Most recent" means the tagged commit with the latest commit time; equal
/// times fall back to the greatest tag name. Tags that do not peel to a
/// commit, or that point outside HEAD's history, are ignored.
pub fn latest_tag(repo: &Repository, pattern: Option<&str>) -> Result<Option<TagRef>, git2::Error> {
    let head = repo.head()?.peel_to_commit()?.id();
    let names = repo.tag_names(pattern)?;

    let mut best: Option<(i64, String, Oid)> = None;
    for name in names.iter().flatten() {
        let Ok(commit) = repo
            .revparse_single(&format!("refs/tags/{name}"))
            .and_then(|obj| obj.peel_to_commit())
        else {
            log_debug!("Skipping tag {} that does not point at a commit", name);
            continue;
        };

        let id = commit.id();
        if id != head && !repo.graph_descendant_of(head, id)? {
            log_debug!("Skipping tag {} outside HEAD history", name);
            continue;
        }

        let candidate = (commit.time().seconds(), name.to_string(), id);
        if best
            .as_ref()
            .is_none_or(|current| (candidate.0, &candidate.1) > (current.0, &current.1))
        {
            best = Some(candidate);
        }
    }

    Ok(best.map(|(_, name, id)| TagRef {
        name,
        commit_hash: id.to_string(),
    }))
}

/// The root commit of HEAD's history: the most distant ancestor with no parent.
pub fn first_commit(repo: &Repository) -> Result<String, git2::Error> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
    revwalk.push_head()?;

    for id in revwalk {
        let commit = repo.find_commit(id?)?;
        if commit.parent_count() == 0 {
            return Ok(commit.id().to_string());
        }
    }

    Err(git2::Error::from_str("HEAD has no root commit"))
}
