use crate::models::{
    AnswerRow, CommissionRow, ListingRow, ProfileRow, QuestionRow, ResourceRow,
    SlaughterhouseRow, UserRow, VideoRow,
};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users & profiles --

    /// Create the credential row and its profile together. The profile is
    /// what the rest of the system references; the users row never changes
    /// after this.
    pub fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO users (id, email, password) VALUES (?1, ?2, ?3)",
                (id, email, password_hash),
            )?;
            tx.execute(
                "INSERT INTO profiles (id, full_name, phone) VALUES (?1, ?2, ?3)",
                (id, full_name, phone),
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_profile(&self, id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| query_profile(conn, id))
    }

    pub fn list_profiles(&self) -> Result<Vec<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, full_name, phone, created_at FROM profiles
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], map_profile)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_profiles(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?)
        })
    }

    // -- Roles --

    pub fn roles_for_user(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT role FROM user_roles WHERE user_id = ?1 ORDER BY created_at")?;
            let rows = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(rows)
        })
    }

    /// True iff any assignment for this user is `superadmin`. Re-evaluated
    /// on every call; nothing is cached.
    pub fn is_superadmin(&self, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let hit: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM user_roles WHERE user_id = ?1 AND role = 'superadmin'",
                    [user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(hit.is_some())
        })
    }

    /// Replace a user's role set: delete everything, then insert the new
    /// role if one was given. Runs in one transaction so no reader ever
    /// observes the intermediate no-role state.
    pub fn set_role(&self, user_id: &str, role: Option<&str>) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM user_roles WHERE user_id = ?1", [user_id])?;
            if let Some(role) = role {
                tx.execute(
                    "INSERT INTO user_roles (user_id, role) VALUES (?1, ?2)",
                    (user_id, role),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Full role scan for the admin user table.
    pub fn all_roles(&self) -> Result<Vec<(String, String)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT user_id, role FROM user_roles")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Listings --

    pub fn insert_listing(
        &self,
        id: &str,
        seller_id: &str,
        title: &str,
        description: &str,
        price: f64,
        location: &str,
        category: &str,
        image_urls: &[String],
    ) -> Result<()> {
        let image_urls_json = serde_json::to_string(image_urls)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO livestock_listings
                     (id, seller_id, title, description, price, location, category, image_urls)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    seller_id,
                    title,
                    description,
                    price,
                    location,
                    category,
                    image_urls_json
                ],
            )?;
            Ok(())
        })
    }

    /// Publicly visible listings only. Pending and inactive rows never show
    /// up here.
    pub fn active_listings(&self) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| query_listings(conn, Some("active")))
    }

    pub fn all_listings(&self) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| query_listings(conn, None))
    }

    pub fn get_listing(&self, id: &str) -> Result<Option<ListingRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, seller_id, title, description, price, location, category,
                        image_urls, status, created_at
                 FROM livestock_listings WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], map_listing).optional()?;
            Ok(row)
        })
    }

    /// Moderation transition. Returns false if the listing does not exist.
    pub fn set_listing_status(&self, id: &str, status: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE livestock_listings SET status = ?1 WHERE id = ?2",
                (status, id),
            )?;
            Ok(changed > 0)
        })
    }

    /// Owner delete: the row must belong to `seller_id` or nothing happens.
    pub fn delete_listing_owned(&self, id: &str, seller_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM livestock_listings WHERE id = ?1 AND seller_id = ?2",
                (id, seller_id),
            )?;
            Ok(deleted > 0)
        })
    }

    /// Admin delete of any listing.
    pub fn delete_listing(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM livestock_listings WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    pub fn count_listings(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM livestock_listings", [], |row| row.get(0))?)
        })
    }

    // -- Commissions --

    /// Commission rows are read-only through the HTTP surface; this insert
    /// exists for operator tooling and tests.
    pub fn insert_commission(
        &self,
        id: &str,
        listing_id: Option<&str>,
        seller_id: Option<&str>,
        amount: f64,
        commission_rate: f64,
        commission_amount: Option<f64>,
        status: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO commissions
                     (id, listing_id, seller_id, amount, commission_rate, commission_amount, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    id,
                    listing_id,
                    seller_id,
                    amount,
                    commission_rate,
                    commission_amount,
                    status
                ],
            )?;
            Ok(())
        })
    }

    pub fn all_commissions(&self) -> Result<Vec<CommissionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, listing_id, seller_id, amount, commission_rate, commission_amount,
                        status, created_at
                 FROM commissions ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(CommissionRow {
                        id: row.get(0)?,
                        listing_id: row.get(1)?,
                        seller_id: row.get(2)?,
                        amount: row.get(3)?,
                        commission_rate: row.get(4)?,
                        commission_amount: row.get(5)?,
                        status: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Forum --

    pub fn insert_question(
        &self,
        id: &str,
        user_id: &str,
        title: &str,
        content: &str,
        category: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (id, user_id, title, content, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, user_id, title, content, category],
            )?;
            Ok(())
        })
    }

    pub fn list_questions(&self) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| {
            // JOIN profiles to fetch the author name in a single query
            let mut stmt = conn.prepare(
                "SELECT q.id, q.user_id, p.full_name, q.title, q.content, q.category, q.created_at
                 FROM questions q
                 LEFT JOIN profiles p ON q.user_id = p.id
                 ORDER BY q.created_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(QuestionRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        author_name: row.get(2)?,
                        title: row.get(3)?,
                        content: row.get(4)?,
                        category: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn question_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let hit: Option<i64> = conn
                .query_row("SELECT 1 FROM questions WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(hit.is_some())
        })
    }

    pub fn insert_answer(
        &self,
        id: &str,
        question_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO answers (id, question_id, user_id, content)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, question_id, user_id, content],
            )?;
            Ok(())
        })
    }

    /// Batch-fetch answers for a set of question IDs.
    pub fn answers_for_questions(&self, question_ids: &[String]) -> Result<Vec<AnswerRow>> {
        if question_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=question_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT a.id, a.question_id, a.user_id, p.full_name, a.content, a.created_at
                 FROM answers a
                 LEFT JOIN profiles p ON a.user_id = p.id
                 WHERE a.question_id IN ({})
                 ORDER BY a.created_at",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = question_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(AnswerRow {
                        id: row.get(0)?,
                        question_id: row.get(1)?,
                        user_id: row.get(2)?,
                        author_name: row.get(3)?,
                        content: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Videos --

    pub fn insert_video(
        &self,
        id: &str,
        user_id: &str,
        title: &str,
        description: &str,
        url: &str,
        category: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO videos (id, user_id, title, description, url, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, user_id, title, description, url, category],
            )?;
            Ok(())
        })
    }

    pub fn list_videos(&self) -> Result<Vec<VideoRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, description, url, category, like_count, created_at
                 FROM videos ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(VideoRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        description: row.get(3)?,
                        url: row.get(4)?,
                        category: row.get(5)?,
                        like_count: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Toggle a like: removes the (video, user) pair if present, inserts it
    /// if not. Returns None if the video does not exist, otherwise
    /// (liked, stored like_count after the update).
    ///
    /// The stored count is maintained by a separate statement from the pair
    /// mutation and can briefly diverge from the true row count.
    pub fn toggle_video_like(
        &self,
        id: &str,
        video_id: &str,
        user_id: &str,
    ) -> Result<Option<(bool, i64)>> {
        self.with_conn(|conn| {
            let video: Option<i64> = conn
                .query_row("SELECT 1 FROM videos WHERE id = ?1", [video_id], |row| row.get(0))
                .optional()?;
            if video.is_none() {
                return Ok(None);
            }

            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM video_likes WHERE video_id = ?1 AND user_id = ?2",
                    (video_id, user_id),
                    |row| row.get(0),
                )
                .optional()?;

            let liked = if let Some(existing_id) = existing {
                conn.execute("DELETE FROM video_likes WHERE id = ?1", [&existing_id])?;
                false
            } else {
                conn.execute(
                    "INSERT INTO video_likes (id, video_id, user_id) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, video_id, user_id],
                )?;
                true
            };

            let delta: i64 = if liked { 1 } else { -1 };
            conn.execute(
                "UPDATE videos SET like_count = MAX(0, like_count + ?1) WHERE id = ?2",
                rusqlite::params![delta, video_id],
            )?;

            let count: i64 = conn.query_row(
                "SELECT like_count FROM videos WHERE id = ?1",
                [video_id],
                |row| row.get(0),
            )?;

            Ok(Some((liked, count)))
        })
    }

    // -- Slaughterhouses --

    pub fn list_slaughterhouses(&self) -> Result<Vec<SlaughterhouseRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, location, price_per_kg, service_fee, phone, address,
                        operating_hours
                 FROM slaughterhouses ORDER BY name",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(SlaughterhouseRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        location: row.get(2)?,
                        price_per_kg: row.get(3)?,
                        service_fee: row.get(4)?,
                        phone: row.get(5)?,
                        address: row.get(6)?,
                        operating_hours: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Educational resources --

    pub fn insert_resource(
        &self,
        id: &str,
        title: &str,
        description: &str,
        category: &str,
        kind: &str,
        duration: Option<&str>,
        url: &str,
        created_by: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO educational_resources
                     (id, title, description, category, kind, duration, url, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![id, title, description, category, kind, duration, url, created_by],
            )?;
            Ok(())
        })
    }

    pub fn list_resources(&self) -> Result<Vec<ResourceRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, category, kind, duration, url, created_by,
                        created_at
                 FROM educational_resources ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(ResourceRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        category: row.get(3)?,
                        kind: row.get(4)?,
                        duration: row.get(5)?,
                        url: row.get(6)?,
                        created_by: row.get(7)?,
                        created_at: row.get(8)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_resource(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM educational_resources WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, email, password, created_at FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_profile(conn: &Connection, id: &str) -> Result<Option<ProfileRow>> {
    let mut stmt =
        conn.prepare("SELECT id, full_name, phone, created_at FROM profiles WHERE id = ?1")?;

    let row = stmt.query_row([id], map_profile).optional()?;

    Ok(row)
}

fn query_listings(conn: &Connection, status: Option<&str>) -> Result<Vec<ListingRow>> {
    let sql = match status {
        Some(_) => {
            "SELECT id, seller_id, title, description, price, location, category, image_urls,
                    status, created_at
             FROM livestock_listings WHERE status = ?1
             ORDER BY created_at DESC"
        }
        None => {
            "SELECT id, seller_id, title, description, price, location, category, image_urls,
                    status, created_at
             FROM livestock_listings
             ORDER BY created_at DESC"
        }
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = match status {
        Some(status) => stmt.query_map([status], map_listing)?,
        None => stmt.query_map([], map_listing)?,
    }
    .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        id: row.get(0)?,
        full_name: row.get(1)?,
        phone: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_listing(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListingRow> {
    Ok(ListingRow {
        id: row.get(0)?,
        seller_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        location: row.get(5)?,
        category: row.get(6)?,
        image_urls: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed_user(db: &Database, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, email, "hash", Some("Test Farmer"), Some("+254700000000"))
            .unwrap();
        id
    }

    fn seed_listing(db: &Database, seller_id: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_listing(
            &id,
            seller_id,
            "Healthy Dairy Cow",
            "Friesian, 3 years old",
            50_000.0,
            "Nakuru",
            "cattle",
            &["https://img.example/cow.jpg".to_string()],
        )
        .unwrap();
        id
    }

    #[test]
    fn create_user_writes_profile_too() {
        let db = test_db();
        let id = seed_user(&db, "farmer@example.com");

        let profile = db.get_profile(&id).unwrap().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Test Farmer"));
        assert_eq!(db.count_profiles().unwrap(), 1);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = test_db();
        seed_user(&db, "farmer@example.com");

        let id = Uuid::new_v4().to_string();
        let result = db.create_user(&id, "farmer@example.com", "hash", None, None);
        assert!(result.is_err());
        assert_eq!(db.count_profiles().unwrap(), 1);
    }

    #[test]
    fn set_role_replaces_whole_set() {
        let db = test_db();
        let user = seed_user(&db, "farmer@example.com");

        // Multiple rows are tolerated as a starting state
        db.with_conn(|conn| {
            conn.execute("INSERT INTO user_roles (user_id, role) VALUES (?1, 'seller')", [&user])?;
            conn.execute("INSERT INTO user_roles (user_id, role) VALUES (?1, 'buyer')", [&user])?;
            Ok(())
        })
        .unwrap();

        db.set_role(&user, Some("superadmin")).unwrap();
        assert_eq!(db.roles_for_user(&user).unwrap(), vec!["superadmin"]);

        db.set_role(&user, Some("buyer")).unwrap();
        assert_eq!(db.roles_for_user(&user).unwrap(), vec!["buyer"]);

        db.set_role(&user, None).unwrap();
        assert!(db.roles_for_user(&user).unwrap().is_empty());
    }

    #[test]
    fn superadmin_check_ignores_other_roles() {
        let db = test_db();
        let user = seed_user(&db, "farmer@example.com");

        assert!(!db.is_superadmin(&user).unwrap());

        db.set_role(&user, Some("admin")).unwrap();
        assert!(!db.is_superadmin(&user).unwrap());

        db.set_role(&user, Some("superadmin")).unwrap();
        assert!(db.is_superadmin(&user).unwrap());
    }

    #[test]
    fn new_listing_is_pending_and_hidden() {
        let db = test_db();
        let seller = seed_user(&db, "seller@example.com");
        let listing = seed_listing(&db, &seller);

        let row = db.get_listing(&listing).unwrap().unwrap();
        assert_eq!(row.status, "pending");
        assert!(db.active_listings().unwrap().is_empty());
        assert_eq!(db.all_listings().unwrap().len(), 1);

        assert!(db.set_listing_status(&listing, "active").unwrap());
        let visible = db.active_listings().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, listing);
    }

    #[test]
    fn negative_price_writes_no_row() {
        let db = test_db();
        let seller = seed_user(&db, "seller@example.com");

        let result = db.insert_listing(
            &Uuid::new_v4().to_string(),
            &seller,
            "Bad",
            "negative price",
            -1.0,
            "Nairobi",
            "goat",
            &["https://img.example/goat.jpg".to_string()],
        );
        assert!(result.is_err());
        assert!(db.all_listings().unwrap().is_empty());
    }

    #[test]
    fn owner_delete_checks_seller() {
        let db = test_db();
        let seller = seed_user(&db, "seller@example.com");
        let other = seed_user(&db, "other@example.com");
        let listing = seed_listing(&db, &seller);

        assert!(!db.delete_listing_owned(&listing, &other).unwrap());
        assert_eq!(db.count_listings().unwrap(), 1);

        assert!(db.delete_listing_owned(&listing, &seller).unwrap());
        assert_eq!(db.count_listings().unwrap(), 0);
    }

    #[test]
    fn admin_delete_clears_commission_link() {
        let db = test_db();
        let seller = seed_user(&db, "seller@example.com");
        let listing = seed_listing(&db, &seller);
        db.insert_commission(
            &Uuid::new_v4().to_string(),
            Some(&listing),
            Some(&seller),
            1000.0,
            10.0,
            Some(100.0),
            "completed",
        )
        .unwrap();

        assert!(db.delete_listing(&listing).unwrap());

        let commissions = db.all_commissions().unwrap();
        assert_eq!(commissions.len(), 1);
        assert_eq!(commissions[0].listing_id, None);
    }

    #[test]
    fn commission_amount_may_be_missing() {
        let db = test_db();
        db.insert_commission(&Uuid::new_v4().to_string(), None, None, 500.0, 10.0, None, "pending")
            .unwrap();

        let rows = db.all_commissions().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].commission_amount, None);
        assert_eq!(rows[0].status, "pending");
    }

    #[test]
    fn question_join_carries_author_name() {
        let db = test_db();
        let user = seed_user(&db, "farmer@example.com");
        let qid = Uuid::new_v4().to_string();
        db.insert_question(&qid, &user, "Mastitis signs?", "What should I look for?", "health")
            .unwrap();
        db.insert_answer(&Uuid::new_v4().to_string(), &qid, &user, "Swelling and heat.")
            .unwrap();

        let questions = db.list_questions().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].author_name.as_deref(), Some("Test Farmer"));

        let answers = db.answers_for_questions(&[qid.clone()]).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question_id, qid);
        assert_eq!(answers[0].author_name.as_deref(), Some("Test Farmer"));
    }

    #[test]
    fn answers_batch_fetch_handles_empty_input() {
        let db = test_db();
        assert!(db.answers_for_questions(&[]).unwrap().is_empty());
    }

    #[test]
    fn like_toggle_round_trips() {
        let db = test_db();
        let user = seed_user(&db, "farmer@example.com");
        let video = Uuid::new_v4().to_string();
        db.insert_video(&video, &user, "Zero grazing setup", "Walkthrough", "https://v.example/1", "feeding")
            .unwrap();

        let (liked, count) = db
            .toggle_video_like(&Uuid::new_v4().to_string(), &video, &user)
            .unwrap()
            .unwrap();
        assert!(liked);
        assert_eq!(count, 1);

        let (liked, count) = db
            .toggle_video_like(&Uuid::new_v4().to_string(), &video, &user)
            .unwrap()
            .unwrap();
        assert!(!liked);
        assert_eq!(count, 0);

        // Two toggles restore the original absence of the pair
        let pairs: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM video_likes", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(pairs, 0);
    }

    #[test]
    fn like_toggle_on_missing_video_is_none() {
        let db = test_db();
        let user = seed_user(&db, "farmer@example.com");
        let missing = Uuid::new_v4().to_string();
        assert!(db
            .toggle_video_like(&Uuid::new_v4().to_string(), &missing, &user)
            .unwrap()
            .is_none());
    }

    #[test]
    fn slaughterhouse_directory_is_seeded_and_sorted() {
        let db = test_db();
        let rows = db.list_slaughterhouses().unwrap();
        assert_eq!(rows.len(), 3);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn resources_insert_list_delete() {
        let db = test_db();
        let admin = seed_user(&db, "admin@example.com");
        let id = Uuid::new_v4().to_string();
        db.insert_resource(
            &id,
            "Dairy basics",
            "Introductory course",
            "feeding",
            "course",
            Some("2h"),
            "https://learn.example/dairy",
            &admin,
        )
        .unwrap();

        assert_eq!(db.list_resources().unwrap().len(), 1);
        assert!(db.delete_resource(&id).unwrap());
        assert!(db.list_resources().unwrap().is_empty());
        assert!(!db.delete_resource(&id).unwrap());
    }
}
