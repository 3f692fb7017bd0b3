use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id          TEXT PRIMARY KEY REFERENCES users(id),
            full_name   TEXT,
            phone       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS user_roles (
            user_id     TEXT NOT NULL REFERENCES users(id),
            role        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, role)
        );

        CREATE INDEX IF NOT EXISTS idx_user_roles_user
            ON user_roles(user_id);

        CREATE TABLE IF NOT EXISTS livestock_listings (
            id          TEXT PRIMARY KEY,
            seller_id   TEXT NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            price       REAL NOT NULL CHECK (price >= 0),
            location    TEXT NOT NULL,
            category    TEXT NOT NULL,
            image_urls  TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'pending',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_listings_status
            ON livestock_listings(status, created_at);

        CREATE TABLE IF NOT EXISTS commissions (
            id                TEXT PRIMARY KEY,
            listing_id        TEXT REFERENCES livestock_listings(id) ON DELETE SET NULL,
            seller_id         TEXT REFERENCES users(id),
            amount            REAL NOT NULL,
            commission_rate   REAL NOT NULL,
            commission_amount REAL,
            status            TEXT NOT NULL DEFAULT 'pending',
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS questions (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            category    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS answers (
            id          TEXT PRIMARY KEY,
            question_id TEXT NOT NULL REFERENCES questions(id),
            user_id     TEXT NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_answers_question
            ON answers(question_id);

        CREATE TABLE IF NOT EXISTS videos (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            url         TEXT NOT NULL,
            category    TEXT NOT NULL,
            like_count  INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS video_likes (
            id          TEXT PRIMARY KEY,
            video_id    TEXT NOT NULL REFERENCES videos(id),
            user_id     TEXT NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(video_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_video_likes_video
            ON video_likes(video_id);

        CREATE TABLE IF NOT EXISTS slaughterhouses (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            location        TEXT NOT NULL,
            price_per_kg    REAL NOT NULL,
            service_fee     REAL NOT NULL,
            phone           TEXT NOT NULL,
            address         TEXT NOT NULL,
            operating_hours TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS educational_resources (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            category    TEXT NOT NULL,
            kind        TEXT NOT NULL,
            duration    TEXT,
            url         TEXT NOT NULL,
            created_by  TEXT NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Seed the processing facility directory
        INSERT OR IGNORE INTO slaughterhouses
            (id, name, location, price_per_kg, service_fee, phone, address, operating_hours)
        VALUES
            ('00000000-0000-0000-0000-000000000101', 'Dagoretti Processing Plant', 'Nairobi',
             450, 1500, '+254 700 111 222', 'Dagoretti Market Rd, Nairobi', 'Mon-Sat 6am-4pm'),
            ('00000000-0000-0000-0000-000000000102', 'Nakuru Meat Works', 'Nakuru',
             420, 1200, '+254 700 333 444', 'Industrial Area, Nakuru', 'Mon-Fri 7am-5pm'),
            ('00000000-0000-0000-0000-000000000103', 'Kiamaiko Goat Market Abattoir', 'Nairobi',
             480, 900, '+254 700 555 666', 'Kiamaiko, Huruma, Nairobi', 'Daily 5am-3pm');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
