//! 真实服务端与真实客户端之间的对局流程

use std::time::Duration;

use go_client::{ClientError, ClientGame, GoClient};
use go_server::{GoServer, ServerConfig};
use protocol::{BoardSize, Color, Message, Mode, Position, ProtocolError};

async fn start_server(mode: Mode) -> String {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        size: BoardSize::NINE,
        mode,
        timeout_secs: 5,
        idle_secs: 60,
    };
    let server = GoServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

async fn join(addr: &str) -> (GoClient, ClientGame) {
    let (mut client, session) = GoClient::connect(addr, Duration::from_secs(5))
        .await
        .unwrap();
    let mut game = ClientGame::from_session(session);
    let turn = client.recv().await.unwrap();
    assert!(matches!(turn, Message::Turn(_)));
    game.apply_message(&turn);
    (client, game)
}

/// 读取一次广播（stones + turn）并更新镜像
async fn sync(client: &mut GoClient, game: &mut ClientGame) {
    let stones = client.recv().await.unwrap();
    assert!(matches!(stones, Message::Stones(_)), "{stones:?}");
    game.apply_message(&stones);
    let turn = client.recv().await.unwrap();
    assert!(matches!(turn, Message::Turn(_)), "{turn:?}");
    game.apply_message(&turn);
}

#[tokio::test]
async fn test_two_players_capture() {
    let addr = start_server(Mode::Normal).await;
    let (mut black, mut black_game) = join(&addr).await;
    let (mut white, mut white_game) = join(&addr).await;

    assert_eq!(black_game.seat().color(), Some(Color::Black));
    assert_eq!(white_game.seat().color(), Some(Color::White));
    assert!(black_game.is_my_turn());
    assert!(!white_game.is_my_turn());

    // 黑 (1,0)，白 (0,0)，黑 (0,1) 提掉角上白子
    let moves = [
        (Color::Black, Position::new(1, 0)),
        (Color::White, Position::new(0, 0)),
        (Color::Black, Position::new(0, 1)),
    ];
    for (color, pos) in moves {
        match color {
            Color::Black => black.send_move(pos).await.unwrap(),
            Color::White => white.send_move(pos).await.unwrap(),
        }
        sync(&mut black, &mut black_game).await;
        sync(&mut white, &mut white_game).await;
    }

    for game in [&black_game, &white_game] {
        assert_eq!(game.snapshot().get(Position::new(0, 0)), None);
        assert_eq!(game.snapshot().stone_count(), 2);
        assert_eq!(game.current_color(), Color::White);
    }
    assert!(white_game.is_my_turn());
}

#[tokio::test]
async fn test_third_player_rejected() {
    let addr = start_server(Mode::Normal).await;
    let _black = join(&addr).await;
    let _white = join(&addr).await;

    let err = GoClient::connect(&addr, Duration::from_secs(5))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ClientError::Protocol(ProtocolError::ServerFull)));
}

#[tokio::test]
async fn test_late_joiner_sees_board() {
    let addr = start_server(Mode::Local).await;
    let (mut first, mut first_game) = join(&addr).await;

    first.send_move(Position::new(4, 4)).await.unwrap();
    sync(&mut first, &mut first_game).await;
    first.send_move(Position::new(3, 3)).await.unwrap();
    sync(&mut first, &mut first_game).await;

    let (_second, second_game) = join(&addr).await;
    assert_eq!(second_game.seat().color(), None);
    assert_eq!(second_game.snapshot(), first_game.snapshot());
    assert_eq!(second_game.current_color(), Color::Black);
}
