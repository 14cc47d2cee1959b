//! Read-time join of rows onto their owning users, shared by the
//! items-by-user and sales-by-user listings.

/// A user as seen by the grouping pass: stable id plus display name.
#[derive(Debug, Clone)]
pub struct Owner {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct OwnerGroup<T> {
    pub user_id: String,
    pub username: String,
    pub rows: Vec<T>,
}

/// Groups `rows` by extracted owner id over the fixed `owners` set.
///
/// Produces one group per owner in enumeration order, each holding the rows
/// whose owner id matches, followed by a bucket (`bucket_id`/`bucket_name`)
/// for rows with no resolvable owner. Rows keep their input order inside each
/// group; no sorting is applied. Recomputed in full on every call.
pub fn group_by_owner<T>(
    owners: &[Owner],
    rows: Vec<T>,
    owner_of: impl Fn(&T) -> Option<&str>,
    bucket_id: &str,
    bucket_name: &str,
) -> Vec<OwnerGroup<T>> {
    let mut groups: Vec<OwnerGroup<T>> = owners
        .iter()
        .map(|owner| OwnerGroup {
            user_id: owner.id.clone(),
            username: owner.name.clone(),
            rows: Vec::new(),
        })
        .collect();
    let mut unowned = OwnerGroup {
        user_id: bucket_id.to_string(),
        username: bucket_name.to_string(),
        rows: Vec::new(),
    };

    for row in rows {
        let slot = owner_of(&row)
            .and_then(|id| groups.iter_mut().find(|group| group.user_id == id))
            .unwrap_or(&mut unowned);
        slot.rows.push(row);
    }

    groups.push(unowned);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        owner: Option<&'static str>,
        tag: &'static str,
    }

    fn owners() -> Vec<Owner> {
        vec![
            Owner {
                id: "u1".into(),
                name: "alice".into(),
            },
            Owner {
                id: "u2".into(),
                name: "carol".into(),
            },
        ]
    }

    #[test]
    fn one_group_per_owner_in_order_plus_bucket() {
        let rows = vec![
            Row {
                owner: Some("u2"),
                tag: "a",
            },
            Row {
                owner: Some("u1"),
                tag: "b",
            },
            Row {
                owner: None,
                tag: "c",
            },
        ];
        let groups = group_by_owner(&owners(), rows, |r| r.owner, "unassigned", "Unassigned");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].username, "alice");
        assert_eq!(groups[1].username, "carol");
        assert_eq!(groups[2].username, "Unassigned");
        assert_eq!(groups[0].rows[0].tag, "b");
        assert_eq!(groups[1].rows[0].tag, "a");
        assert_eq!(groups[2].rows[0].tag, "c");
    }

    #[test]
    fn zero_row_owners_keep_empty_groups() {
        let groups =
            group_by_owner::<Row>(&owners(), vec![], |r| r.owner, "unassigned", "Unassigned");
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.rows.is_empty()));
    }

    #[test]
    fn dangling_owner_ids_land_in_the_bucket() {
        let rows = vec![Row {
            owner: Some("deleted-user"),
            tag: "a",
        }];
        let groups = group_by_owner(&owners(), rows, |r| r.owner, "unknown", "Unknown");
        assert!(groups[0].rows.is_empty());
        assert!(groups[1].rows.is_empty());
        assert_eq!(groups[2].rows.len(), 1);
    }

    #[test]
    fn union_of_groups_covers_every_row() {
        let rows = vec![
            Row {
                owner: Some("u1"),
                tag: "a",
            },
            Row {
                owner: Some("u1"),
                tag: "b",
            },
            Row {
                owner: Some("u2"),
                tag: "c",
            },
            Row {
                owner: None,
                tag: "d",
            },
        ];
        let groups = group_by_owner(&owners(), rows, |r| r.owner, "unassigned", "Unassigned");
        let total: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(total, 4);
        // Insertion order survives within a group.
        let tags: Vec<_> = groups[0].rows.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec!["a", "b"]);
    }
}
