use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{error, warn};
use std::fs::File;
use std::io::prelude::*;

use crate::param::{
    DEFAULT_PASSWORD_STRENGTH, HEADER_TEMPLATE, MAX_PASSWORD_STRENGTH, MIN_PASSWORD_STRENGTH,
    TEMPLATE_ROOT,
};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_password_strength")]
    password_strength: u32,
    #[serde(default = "default_template_root")]
    template_root: String,
    #[serde(default = "default_header_template")]
    header_template: String,
}

fn default_password_strength() -> u32 {
    DEFAULT_PASSWORD_STRENGTH
}

fn default_template_root() -> String {
    TEMPLATE_ROOT.to_string()
}

fn default_header_template() -> String {
    HEADER_TEMPLATE.to_string()
}

impl Config {
    pub fn new() -> Self {
        Self {
            password_strength: default_password_strength(),
            template_root: default_template_root(),
            header_template: default_header_template(),
        }
    }

    pub fn from_toml(filename: &str) -> Self {
        let mut file = match File::open(filename) {
            Ok(f) => f,
            Err(e) => {
                error!("无法打开配置文件{}：{}，使用默认配置", filename, e);
                return Config::new();
            }
        };
        let mut str_val = String::new();
        if let Err(e) = file.read_to_string(&mut str_val) {
            error!("读取配置文件{}失败：{}，使用默认配置", filename, e);
            return Config::new();
        }
        Self::from_toml_str(&str_val)
    }

    pub fn from_toml_str(content: &str) -> Self {
        let raw_config: Config = match toml::from_str(content) {
            Ok(t) => t,
            Err(_) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置");
                return Config::new();
            }
        };
        // 越界的成本因子不在这里修正，由 AuthCodec::new 在启动时报错
        if raw_config.password_strength < MIN_PASSWORD_STRENGTH
            || raw_config.password_strength > MAX_PASSWORD_STRENGTH
        {
            warn!(
                "password_strength被设置为{}，超出bcrypt允许的范围{}..={}",
                raw_config.password_strength, MIN_PASSWORD_STRENGTH, MAX_PASSWORD_STRENGTH
            );
        }
        raw_config
    }

    pub fn with_password_strength(mut self, strength: u32) -> Self {
        self.password_strength = strength;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn password_strength(&self) -> u32 {
        self.password_strength
    }

    pub fn template_root(&self) -> &str {
        &self.template_root
    }

    pub fn header_template(&self) -> &str {
        &self.header_template
    }
}
