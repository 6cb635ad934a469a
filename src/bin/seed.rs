use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use game_exchange_api::{config::AppConfig, db::create_pool, slug::slugify};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(
        &pool,
        "Admin User",
        "admin@gameexchange.com",
        "password123",
        "admin",
        true,
        Some("Platform administrator"),
    )
    .await?;
    let john = ensure_user(
        &pool,
        "John Gamer",
        "john@example.com",
        "password123",
        "user",
        true,
        Some("Passionate gamer and collector. Always looking for rare titles!"),
    )
    .await?;
    let sarah = ensure_user(
        &pool,
        "Sarah Player",
        "sarah@example.com",
        "password123",
        "user",
        true,
        Some("Love RPGs and adventure games. Happy to trade!"),
    )
    .await?;
    let mike = ensure_user(
        &pool,
        "Mike Collector",
        "mike@example.com",
        "password123",
        "user",
        false,
        Some("Building my collection one game at a time."),
    )
    .await?;

    let sellers = [john, sarah, mike];
    seed_listings(&pool, &sellers).await?;
    seed_reviews(&pool, &sellers).await?;
    seed_messages(&pool, john, sarah).await?;
    seed_notifications(&pool, &[admin_id, john, sarah, mike]).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    verified: bool,
    bio: Option<&str>,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, name, password_hash, role, verified, bio)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(role)
    .bind(verified)
    .bind(bio)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch the id.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_listings(pool: &sqlx::PgPool, sellers: &[Uuid]) -> anyhow::Result<()> {
    let games: Vec<(&str, &str, i64, &str)> = vec![
        (
            "Spider-Man: Miles Morales",
            "Experience the rise of Miles Morales as the new hero masters incredible new powers. Includes all DLC content; disc, case and manual in perfect condition.",
            2999,
            "like_new",
        ),
        (
            "Demon's Souls",
            "A remake of the PlayStation classic, entirely rebuilt from the ground up. Unsettling story, ruthless combat.",
            3499,
            "very_good",
        ),
        (
            "Horizon Forbidden West",
            "Join Aloy as she braves the Forbidden West, a majestic but dangerous frontier concealing mysterious new threats.",
            3999,
            "new",
        ),
        (
            "God of War Ragnarok",
            "An epic and heartfelt journey as Kratos and Atreus struggle with holding on and letting go. First-class condition with original case.",
            4499,
            "like_new",
        ),
        (
            "Ratchet and Clank: Rift Apart",
            "Blast your way through an interdimensional adventure. Jump between action-packed worlds at hyper-speed.",
            3299,
            "very_good",
        ),
        (
            "Gran Turismo 7",
            "The very best features of the Real Driving Simulator. Buy, tune, race and sell your way through the campaign.",
            3599,
            "good",
        ),
        (
            "Ghost of Tsushima Director's Cut",
            "Tsushima Island is all that stands between mainland Japan and a massive Mongol invasion fleet. Includes the Iki Island expansion.",
            4199,
            "like_new",
        ),
        (
            "The Last of Us Part II",
            "Five years after their journey across the post-pandemic United States, Ellie and Joel have settled down in Jackson, Wyoming.",
            2899,
            "very_good",
        ),
        (
            "Returnal",
            "Break the cycle of chaos on an always-changing alien planet. After crash-landing, Selene must search the barren landscape for her escape.",
            3199,
            "good",
        ),
        (
            "Final Fantasy XVI",
            "An epic dark fantasy where the fate of the land is decided by the mighty Eikons and the Dominants who wield them.",
            4999,
            "new",
        ),
        (
            "Marvel's Spider-Man 2",
            "Peter Parker and Miles Morales face the ultimate test of strength as they fight to save the city from Venom and the symbiote threat.",
            5499,
            "like_new",
        ),
        (
            "Hogwarts Legacy",
            "Experience Hogwarts in the 1800s. Explore the castle, Hogsmeade, the Forbidden Forest and the surrounding Overland area.",
            3899,
            "very_good",
        ),
    ];

    for (i, (title, desc, price_cents, condition)) in games.iter().enumerate() {
        let seller = sellers[i % sellers.len()];
        sqlx::query(
            r#"
            INSERT INTO listings (id, title, slug, description, price_cents, condition, images, seller_id, views)
            VALUES ($1, $2, $3, $4, $5, $6, '[]', $7, $8)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(slugify(title))
        .bind(desc)
        .bind(price_cents)
        .bind(condition)
        .bind(seller)
        .bind((i as i64 * 37) % 500)
        .execute(pool)
        .await?;
    }

    println!("Seeded listings");
    Ok(())
}

async fn seed_reviews(pool: &sqlx::PgPool, sellers: &[Uuid]) -> anyhow::Result<()> {
    let comments = [
        "Great condition, exactly as described!",
        "Fast shipping and excellent communication.",
        "Perfect transaction, highly recommended seller!",
        "Game works perfectly, very happy with purchase.",
        "Amazing deal, will buy from again!",
    ];

    let listings: Vec<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, seller_id FROM listings ORDER BY created_at LIMIT 5")
            .fetch_all(pool)
            .await?;

    for (i, (listing_id, seller_id)) in listings.iter().enumerate() {
        // Any seeded user other than the seller can review.
        let Some(author) = sellers.iter().find(|u| *u != seller_id) else {
            continue;
        };
        sqlx::query(
            r#"
            INSERT INTO reviews (id, listing_id, author_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (listing_id, author_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(listing_id)
        .bind(author)
        .bind(4 + (i as i32 % 2))
        .bind(comments[i % comments.len()])
        .execute(pool)
        .await?;
    }

    println!("Seeded reviews");
    Ok(())
}

async fn seed_messages(pool: &sqlx::PgPool, buyer: Uuid, seller: Uuid) -> anyhow::Result<()> {
    let thread = [
        (buyer, seller, "Is this game still available?", false),
        (
            seller,
            buyer,
            "Yes, it's still available! Would you like to purchase it?",
            true,
        ),
    ];

    for (sender, receiver, content, read) in thread {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, content, read)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (
                SELECT 1 FROM messages WHERE sender_id = $2 AND receiver_id = $3 AND content = $4
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sender)
        .bind(receiver)
        .bind(content)
        .bind(read)
        .execute(pool)
        .await?;
    }

    println!("Seeded messages");
    Ok(())
}

async fn seed_notifications(pool: &sqlx::PgPool, users: &[Uuid]) -> anyhow::Result<()> {
    for user in users {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body)
            SELECT $1, $2, 'welcome', 'Welcome to Game Exchange!',
                   'Thanks for joining our community. Start browsing games or list your own!'
            WHERE NOT EXISTS (
                SELECT 1 FROM notifications WHERE user_id = $2 AND title = 'Welcome to Game Exchange!'
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user)
        .execute(pool)
        .await?;
    }

    println!("Seeded notifications");
    Ok(())
}
