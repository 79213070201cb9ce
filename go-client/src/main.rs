use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use go_client::{handle_input, ClientConfig, ClientGame, Command, GoClient, LocalGame};
use protocol::{MoveIntent, ProtocolError};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // 日志输出到 stderr，避免和棋盘混在一起
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("go_client=debug".parse()?))
        .init();

    let config = ClientConfig::parse();
    let input = BufReader::new(tokio::io::stdin()).lines();

    println!("输入 `x y` 落子，`hover x y` 高亮，`undo`/`redo` 悔棋重做（仅本地），`quit` 退出");
    if config.local {
        play_local(&config, input).await
    } else {
        play_online(&config, input).await
    }
}

async fn play_local(config: &ClientConfig, mut input: Input) -> Result<()> {
    let local = LocalGame::start(config.size);
    let mut updates = local.updates();
    let mut game = ClientGame::local(config.size);
    println!("{}", game.view());

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line.context("无法读取输入")? else { break };
                let intent = match Command::parse(&line) {
                    Some(Command::Input(event)) => handle_input(&mut game, event),
                    Some(Command::Undo) => Some(MoveIntent::Undo),
                    Some(Command::Redo) => Some(MoveIntent::Redo),
                    Some(Command::Quit) => break,
                    None => {
                        println!("无法识别的命令: {line}");
                        continue;
                    }
                };
                match intent {
                    Some(intent) => local.post(intent)?,
                    None => println!("{}", game.view()),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                game.apply_update(&updates.borrow_and_update());
                println!("{}", game.view());
            }
        }
    }

    if let Some(state) = local.finish().await {
        info!("本地对局结束，共 {} 手", state.history_position());
    }
    Ok(())
}

async fn play_online(config: &ClientConfig, mut input: Input) -> Result<()> {
    let addr = config.network().addr();
    let (mut client, session) = match GoClient::connect(&addr, config.read_timeout()).await {
        Ok(connected) => connected,
        Err(go_client::ClientError::Protocol(e)) => {
            let reason = match &e {
                ProtocolError::VersionMismatch { .. } | ProtocolError::VersionRejected(_) => {
                    "协议版本不兼容"
                }
                ProtocolError::ServerFull => "服务端已满",
                ProtocolError::ConnectionTimeout => "连接超时",
                _ => "连接失败",
            };
            return Err(anyhow::Error::new(e).context(format!("{reason} ({addr})")));
        }
        Err(e) => return Err(e.into()),
    };

    let mut game = ClientGame::from_session(session);
    match game.seat().color() {
        Some(color) => println!("你执 {color}"),
        None => println!("本地模式：可以替双方落子"),
    }
    println!("{}", game.view());

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line.context("无法读取输入")? else { break };
                match Command::parse(&line) {
                    Some(Command::Input(event)) => match handle_input(&mut game, event) {
                        Some(MoveIntent::Place(pos)) => client.send_move(pos).await?,
                        _ => println!("{}", game.view()),
                    },
                    Some(Command::Undo | Command::Redo) => println!("联网对局不支持悔棋"),
                    Some(Command::Quit) => break,
                    None => println!("无法识别的命令: {line}"),
                }
            }
            msg = client.recv() => {
                let Ok(msg) = msg else {
                    warn!("与服务端的连接已断开");
                    break;
                };
                // 快照之后紧跟 turn，等 turn 到达再刷新
                if game.apply_message(&msg) && matches!(msg, protocol::Message::Turn(_)) {
                    println!("{}", game.view());
                }
            }
        }
    }

    client.disconnect().await.ok();
    Ok(())
}
