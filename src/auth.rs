// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 密码哈希模块
//!
//! 对 bcrypt 的薄封装。成本因子在构造时注入并校验，不从全局配置读取，
//! 因此测试可以使用最低成本因子快速运行。

use log::{debug, error};

use crate::{
    config::Config,
    exception::Exception,
    param::{MAX_PASSWORD_STRENGTH, MIN_PASSWORD_STRENGTH},
};

#[derive(Debug, Clone, Copy)]
pub struct AuthCodec {
    cost: u32,
}

impl AuthCodec {
    /// 成本因子必须位于 bcrypt 允许的范围内，否则返回 [`Exception::HashConfig`]。
    ///
    /// 该错误属于配置错误，调用方应当在启动阶段直接终止。
    pub fn new(cost: u32) -> Result<Self, Exception> {
        if !(MIN_PASSWORD_STRENGTH..=MAX_PASSWORD_STRENGTH).contains(&cost) {
            error!("bcrypt成本因子{}超出允许范围", cost);
            return Err(Exception::HashConfig(cost));
        }
        Ok(Self { cost })
    }

    pub fn from_config(config: &Config) -> Result<Self, Exception> {
        Self::new(config.password_strength())
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// 生成带随机盐的 bcrypt 哈希。
    ///
    /// # Panics
    /// 成本因子已在构造时校验，bcrypt 仍然失败说明运行环境不可用，此时直接终止。
    pub fn hash_password(&self, plaintext: &str) -> String {
        match bcrypt::hash(plaintext, self.cost) {
            Ok(hashed) => hashed,
            Err(e) => {
                error!("bcrypt无法生成密码哈希：{}", e);
                panic!("bcrypt无法生成密码哈希：{}", e);
            }
        }
    }

    /// 密码与哈希匹配时返回 `true`。哈希格式错误等任何错误都视为不匹配。
    pub fn verify_password(&self, plaintext: &str, stored_hash: &str) -> bool {
        match bcrypt::verify(plaintext, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                debug!("密码校验失败，按不匹配处理：{}", e);
                false
            }
        }
    }
}
