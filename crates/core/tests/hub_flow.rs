use cubehub_core::{
    Content, Currency, Event, GameConfig, GameHub, HubError, Minigame, Reveal, RunPhase, SaveData,
    ShopId, Stake, WagerError, WordValidator,
};

fn hub() -> GameHub {
    GameHub::new(GameConfig::default(), Content::builtin(), 2024)
}

fn buy_all(hub: &mut GameHub, shop: ShopId, ids: &[&str]) {
    for id in ids {
        hub.try_purchase(shop, id)
            .unwrap_or_else(|err| panic!("buy {id}: {err}"));
    }
}

#[test]
fn clicking_empties_the_cube_and_reveals_the_shop() {
    let mut hub = hub();
    for _ in 0..9 {
        let outcome = hub.click().expect("click");
        assert!(!outcome.shop_revealed);
    }
    let last = hub.click().expect("last click");
    assert!(last.shop_revealed);
    assert_eq!(last.cooldown, Some(60));
    assert_eq!(hub.balance(Currency::Money), 10);
    assert!(matches!(hub.click(), Err(HubError::Click(_))));

    assert!(!hub.tick(59));
    assert!(hub.tick(1));
    assert_eq!(hub.progression.cube.health, 10);
    assert_eq!(hub.stats.clicks, 10);
}

#[test]
fn unlock_path_opens_the_letter_game() {
    let mut hub = hub();
    assert_eq!(
        hub.letters_submit().map(|outcome| outcome.score),
        Err(HubError::MinigameLocked(Minigame::Letters))
    );
    hub.add_currency(Currency::Money, 20);
    buy_all(
        &mut hub,
        ShopId::Main,
        &["heal-on-purchase", "shorten-timer", "unlock-letter-game"],
    );
    assert!(hub.is_unlocked(Minigame::Letters));
    assert_eq!(hub.balance(Currency::Money), 0);
    assert_eq!(hub.progression.cube.cooldown_duration(), 55);

    let first = hub.letters.hand[0];
    let second = hub.letters.hand[1];
    let word: String = [first.letter, second.letter].iter().collect();
    hub.words = WordValidator::from_word_list(&word).expect("word list");

    let letters = hub.letters_mut().expect("unlocked");
    letters.place_tile(first.id).expect("place first");
    letters.place_tile(second.id).expect("place second");
    let preview = letters.preview();
    let outcome = hub.letters_submit().expect("submit");
    assert_eq!(outcome, preview);
    assert_eq!(outcome.score, (first.chips + second.chips) * 2);
    assert_eq!(hub.balance(Currency::Tiles), outcome.score);
    assert_eq!(hub.stats.words_scored, 1);
    assert_eq!(hub.letters.hand.len(), 7);
}

#[test]
fn unloaded_word_list_is_reported() {
    let mut hub = hub();
    hub.progression.features.insert(Minigame::Letters.feature());
    let tiles: Vec<u32> = hub.letters.hand.iter().take(2).map(|tile| tile.id).collect();
    let letters = hub.letters_mut().expect("unlocked");
    for id in tiles {
        letters.place_tile(id).expect("place");
    }
    assert!(matches!(hub.letters_submit(), Err(HubError::Letter(_))));
    assert_eq!(hub.balance(Currency::Tiles), 0);
}

#[test]
fn snake_rewards_follow_extra_food() {
    let mut hub = hub();
    hub.add_currency(Currency::Money, 30);
    buy_all(
        &mut hub,
        ShopId::Main,
        &["heal-on-purchase", "health-boost", "unlock-snake"],
    );
    assert_eq!(hub.snake_finished(3), Ok(3));
    hub.add_currency(Currency::Emeralds, 19);
    buy_all(&mut hub, ShopId::Snake, &["border-portals", "extra-food"]);
    assert_eq!(hub.snake_finished(5), Ok(10));
    assert_eq!(hub.balance(Currency::Emeralds), 10);
    assert_eq!(hub.snake_lives(), 1);
    assert_eq!(hub.stats.snake_games, 2);
}

#[test]
fn card_game_unlocks_from_the_diamond_shop() {
    let mut hub = hub();
    hub.add_currency(Currency::Diamonds, 45);
    buy_all(&mut hub, ShopId::Diamond, &["bomb-slider", "unlock-card-game"]);
    assert!(hub.is_unlocked(Minigame::Cards));
    assert_eq!(hub.card_play().map(|_| ()), Err(HubError::NoCardRun));

    let run = hub.start_card_run().expect("start");
    assert_eq!(run.hand.len(), 8);
    run.select_indices(&[0, 1, 2, 3, 4]).expect("select");
    hub.events.drain().for_each(drop);
    let outcome = hub.card_play().expect("play");
    assert!(outcome.breakdown.total > 0);
    assert!(hub
        .events
        .drain()
        .any(|event| matches!(event, Event::HandScored { .. })));
    assert_eq!(hub.stats.best_card_score, outcome.breakdown.total);

    let run = hub.card_run_mut().expect("run");
    assert_eq!(run.state.hands_left, 3);
    assert_ne!(run.phase(), RunPhase::GameOver);
}

#[test]
fn busted_wager_forfeits_the_stake() {
    let mut hub = hub();
    hub.progression.features.insert(Minigame::Wager.feature());
    hub.add_currency(Currency::Money, 10);
    hub.add_currency(Currency::Diamonds, 5);
    let stake = Stake {
        money: 10,
        diamonds: 5,
        ..Stake::default()
    };
    assert_eq!(
        hub.wager_open(stake, 2),
        Err(HubError::Wager(WagerError::BombSliderLocked))
    );
    hub.wager_open(stake, 1).expect("open");
    assert_eq!(hub.balance(Currency::Money), 0);
    assert_eq!(hub.balance(Currency::Diamonds), 0);

    let mut safe = 0;
    for index in 0..25 {
        match hub.wager_reveal(index).expect("reveal") {
            Reveal::Diamond => safe += 1,
            Reveal::Bomb => break,
            Reveal::AlreadyRevealed => unreachable!(),
        }
    }
    assert!(safe < 25);
    let session = hub.wager.as_ref().expect("session");
    assert!(session.is_busted());
    assert_eq!(hub.wager_cash_out().map(|payout| payout.money), Ok(0));
    assert_eq!(hub.balance(Currency::Money), 0);
    assert_eq!(hub.balance(Currency::Diamonds), 0);
    assert_eq!(hub.wager_cash_out(), Err(HubError::NoWager));
}

#[test]
fn save_survives_json() {
    let mut hub = hub();
    hub.add_currency(Currency::Money, 60);
    hub.add_currency(Currency::Sapphires, 3);
    buy_all(
        &mut hub,
        ShopId::Main,
        &["heal-on-purchase", "boost-payout", "shorten-timer"],
    );
    hub.click().expect("click");

    let body = serde_json::to_string(&hub.snapshot()).expect("serialize");
    let save: SaveData = serde_json::from_str(&body).expect("parse");
    let mut restored = GameHub::new(GameConfig::default(), Content::builtin(), 1);
    restored.restore(&save);

    assert_eq!(restored.snapshot(), hub.snapshot());
    assert_eq!(restored.progression.cube.click_value, 2);
    assert_eq!(restored.progression.cube.cooldown_duration(), 55);
    assert_eq!(
        restored.tree(ShopId::Main).map(|tree| tree.current_price("boost-payout")),
        Some(Some(75))
    );
}

#[test]
fn restore_ignores_unknown_upgrades_and_clamps_counts() {
    let body = r#"{
        "upgrades": {
            "snake": {
                "border-portals": { "purchased": true, "purchase_count": 4, "maxed": false },
                "retired-upgrade": { "purchased": true, "purchase_count": 2, "maxed": false }
            }
        }
    }"#;
    let save: SaveData = serde_json::from_str(body).expect("parse");
    let mut hub = hub();
    hub.restore(&save);
    let tree = hub.tree(ShopId::Snake).expect("snake tree");
    let state = tree.state("border-portals");
    assert_eq!(state.purchase_count, 1);
    assert!(state.maxed);
    assert!(!tree.states().contains_key("retired-upgrade"));
}
