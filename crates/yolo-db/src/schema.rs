//! SQL schema definitions.

/// Complete schema for the Yolo v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Identity
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    display_name TEXT NOT NULL,
    avatar TEXT,
    bio TEXT,
    balance INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0),
    created_at INTEGER NOT NULL
);

-- ============================================================
-- Challenges
-- ============================================================

CREATE TABLE IF NOT EXISTS challenges (
    id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 100),
    estimated_time TEXT,
    status TEXT NOT NULL CHECK (status IN ('active', 'completed')),
    photo_url TEXT,
    completed_at INTEGER,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_challenges_user ON challenges(user_id);
CREATE INDEX IF NOT EXISTS idx_challenges_feed ON challenges(status, completed_at);
-- At most one active challenge per user.
CREATE UNIQUE INDEX IF NOT EXISTS idx_challenges_one_active
    ON challenges(user_id) WHERE status = 'active';

-- ============================================================
-- Engagement
-- ============================================================

CREATE TABLE IF NOT EXISTS comments (
    id BLOB PRIMARY KEY,
    challenge_id BLOB NOT NULL REFERENCES challenges(id),
    user_id BLOB NOT NULL REFERENCES users(id),
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_challenge ON comments(challenge_id);

CREATE TABLE IF NOT EXISTS likes (
    id BLOB PRIMARY KEY,
    challenge_id BLOB NOT NULL REFERENCES challenges(id),
    user_id BLOB NOT NULL REFERENCES users(id),
    created_at INTEGER NOT NULL,
    UNIQUE (challenge_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_likes_user ON likes(user_id);

CREATE TABLE IF NOT EXISTS check_ins (
    user_id BLOB NOT NULL REFERENCES users(id),
    day INTEGER NOT NULL,
    PRIMARY KEY (user_id, day)
);

-- ============================================================
-- Social graph
-- ============================================================

CREATE TABLE IF NOT EXISTS follows (
    follower_id BLOB NOT NULL REFERENCES users(id),
    followee_id BLOB NOT NULL REFERENCES users(id),
    created_at INTEGER NOT NULL,
    PRIMARY KEY (follower_id, followee_id),
    CHECK (follower_id <> followee_id)
);

CREATE INDEX IF NOT EXISTS idx_follows_followee ON follows(followee_id);
"#;
