// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 站点辅助工具控制台
//!
//! 在终端中交互式地调用站点的辅助函数，便于运维与调试：
//! - 为初始化用户表生成 bcrypt 密码哈希，或校验已有哈希
//! - 查看请求路径如何被拆分为路由段与查询参数
//! - 以登录/未登录身份预览带页头的页面模板
//! - 生成 JSON 响应体

use std::cell::RefCell;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use site_helpers::{
    json_response, marshal_json,
    param::{CONFIG_PATH, LOG_CONFIG_PATH},
    request, util, AuthCodec, Config, Exception, PageData, PageRenderer, RequestContext, User,
};

/// 控制台自身维护的会话，用于预览登录状态下的页头。
#[derive(Default)]
struct ConsoleSession {
    user: RefCell<Option<User>>,
}

impl RequestContext for ConsoleSession {
    fn is_user_logged_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    fn user_id(&self) -> u64 {
        self.user.borrow().as_ref().map_or(0, |u| u.id)
    }

    fn get_user(&self, id: u64) -> Result<User, Exception> {
        match self.user.borrow().as_ref() {
            Some(user) if user.id == id => Ok(user.clone()),
            _ => Err(Exception::UserLookupFailed(format!("no user with id {}", id))),
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. 初始化日志系统：log4rs 通过外部 YAML 配置级别与输出目的地
    if let Err(e) = log4rs::init_file(LOG_CONFIG_PATH, Default::default()) {
        eprintln!("无法初始化日志系统（{}）：{}", LOG_CONFIG_PATH, e);
    }

    // 2. 载入配置
    let config = Config::from_toml(CONFIG_PATH);
    info!("配置文件已载入");
    info!("模板根目录：{}", config.template_root());

    // 3. 成本因子越界属于配置错误，直接终止
    let codec = match AuthCodec::from_config(&config) {
        Ok(codec) => codec,
        Err(e) => {
            error!("{}", e);
            panic!("{}", e);
        }
    };
    let renderer = PageRenderer::from_config(&config);
    let session = ConsoleSession::default();

    println!("输入 help 查看可用命令");
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut input = String::new();
    loop {
        input.clear();
        match reader.read_line(&mut input).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("读取标准输入失败：{}", e);
                break;
            }
        }
        let line = input.trim();
        let (cmd, args) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        debug!("控制台命令：{} {}", cmd, args);
        match cmd {
            "" => {}
            "stop" | "exit" => break,
            "help" => print_help(),
            "hash" => {
                if args.is_empty() {
                    println!("用法：hash <password>");
                    continue;
                }
                println!("{}", codec.hash_password(args));
            }
            "verify" => match args.rsplit_once(' ') {
                Some((password, hash)) => {
                    println!("{}", codec.verify_password(password, hash));
                }
                None => println!("用法：verify <password> <hash>"),
            },
            "routes" => {
                println!("split_routes: {}", util::stringify(&request::split_routes(args)));
                println!("routes:       {}", util::stringify(&request::routes(args)));
                println!("last_route:   \"{}\"", request::last_route(args));
                print!("{}", util::stringify_multi_map(&request::query_params(args)));
            }
            "login" => {
                if args.is_empty() {
                    println!("用法：login <display name>");
                    continue;
                }
                *session.user.borrow_mut() = Some(User {
                    id: 1,
                    display_name: args.to_string(),
                });
                println!("已作为 {} 登录", args);
            }
            "logout" => {
                *session.user.borrow_mut() = None;
                println!("已登出");
            }
            "render" => {
                let (template_id, title) = match args.split_once(' ') {
                    Some((t, rest)) => (t, rest.trim()),
                    None => (args, args),
                };
                if template_id.is_empty() {
                    println!("用法：render <template> [title]");
                    continue;
                }
                let page = PageData::new(title, "", Vec::new(), Vec::new());
                match renderer.render_with_header(template_id, &page, &session) {
                    Ok(html) => println!("{}", html),
                    Err(e) => {
                        warn!("预览模板{}失败：{}", template_id, e);
                        println!("{}", e.public_message());
                    }
                }
            }
            "json" => match marshal_json(&json_response(args)) {
                Ok(body) => println!("{}", body),
                Err(e) => println!("{}", e.public_message()),
            },
            _ => println!("无效的命令：{}", cmd),
        }
    }
    info!("控制台退出");
}

fn print_help() {
    println!("== Site Helpers Help ==");
    println!("hash <password>            - 生成 bcrypt 密码哈希");
    println!("verify <password> <hash>   - 校验密码与哈希是否匹配");
    println!("routes <path>              - 查看路径拆分结果与查询参数");
    println!("login <display name>       - 以指定显示名登录控制台会话");
    println!("logout                     - 登出控制台会话");
    println!("render <template> [title]  - 以当前会话预览带页头的页面");
    println!("json <message>             - 生成 JSON 响应体");
    println!("stop                       - 退出");
    println!("=======================");
}
