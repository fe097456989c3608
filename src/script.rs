use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::chain::OrderedChain;

/*
 * One operation on a named chain
 */
#[derive(Debug, PartialEq, Eq)]
pub enum Op {
    New(i32),
    Prepend(i32),
    Append(i32),
    Remove(i32),
    Sort,
    Swap(String),
    SwapNode(i32, i32),
    Print,
    Expect(Vec<i32>),
    ExpectSize(usize),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Command {
    pub line: usize,
    pub chain: String,
    pub op: Op,
}

/*
 * Parse a script.
 * Each non-empty line that is not a comment should be formatted as follows :
 * <chain> <operation> [arguments...]
 */
pub fn parse(input: &str) -> Result<Vec<Command>> {
    let re = Regex::new(r"^\s*([A-Za-z_]\w*)\s+([a-z_]+)((?:\s+\S+)*)\s*$")?;
    let mut commands = vec![];

    for (i, l) in input.lines().enumerate() {
        let line = i + 1;
        let trimmed = l.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let captures = re
            .captures(l)
            .ok_or(anyhow!("Failed to parse line {}: {}", line, l))?;
        let chain = captures[1].to_string();
        let name = &captures[2];
        let args: Vec<&str> = captures
            .get(3)
            .map(|m| m.as_str().split_whitespace().collect())
            .unwrap_or_default();

        let op = parse_op(name, &args)
            .with_context(|| format!("Invalid command on line {}", line))?;
        commands.push(Command { line, chain, op });
    }

    Ok(commands)
}

fn parse_op(name: &str, args: &[&str]) -> Result<Op> {
    let int = |i: usize| -> Result<i32> {
        let arg = args.get(i).ok_or(anyhow!("Missing argument {} for {}", i + 1, name))?;
        arg.parse()
            .with_context(|| format!("Failed to parse integer {}", arg))
    };
    let arity = |n: usize| -> Result<()> {
        if args.len() != n {
            bail!("{} takes {} argument(s), got {}", name, n, args.len());
        }
        Ok(())
    };

    let op = match name {
        "new" => {
            arity(1)?;
            Op::New(int(0)?)
        }
        "prepend" => {
            arity(1)?;
            Op::Prepend(int(0)?)
        }
        "append" => {
            arity(1)?;
            Op::Append(int(0)?)
        }
        "remove" => {
            arity(1)?;
            Op::Remove(int(0)?)
        }
        "sort" => {
            arity(0)?;
            Op::Sort
        }
        "swap" => {
            arity(1)?;
            Op::Swap(args[0].to_string())
        }
        "swap_node" => {
            arity(2)?;
            Op::SwapNode(int(0)?, int(1)?)
        }
        "print" => {
            arity(0)?;
            Op::Print
        }
        "expect" => Op::Expect((0..args.len()).map(int).collect::<Result<_>>()?),
        "expect_size" => {
            arity(1)?;
            let size = args[0]
                .parse()
                .with_context(|| format!("Failed to parse size {}", args[0]))?;
            Op::ExpectSize(size)
        }
        other => bail!("Unknown operation {}", other),
    };
    Ok(op)
}

/*
 * Named chains created and modified by a script
 */
#[derive(Default)]
pub struct Session {
    chains: HashMap<String, OrderedChain>,
}

impl Session {
    pub fn run(&mut self, commands: &[Command]) -> Result<()> {
        for command in commands {
            self.apply(command)
                .with_context(|| format!("Command on line {} failed", command.line))?;
        }
        info!(commands = commands.len(), chains = self.chains.len(), "script finished");
        Ok(())
    }

    pub fn apply(&mut self, command: &Command) -> Result<()> {
        debug!(line = command.line, chain = %command.chain, op = ?command.op, "apply");

        let name = &command.chain;
        match &command.op {
            Op::New(seed) => {
                self.chains.insert(name.clone(), OrderedChain::new(*seed));
            }
            Op::Swap(other) => self.swap(name, other)?,
            Op::Prepend(value) => self.get_mut(name)?.prepend(*value),
            Op::Append(value) => self.get_mut(name)?.append(*value),
            Op::Remove(value) => self.get_mut(name)?.remove(*value),
            Op::Sort => self.get_mut(name)?.sort(),
            Op::SwapNode(a, b) => self.get_mut(name)?.swap_node(*a, *b),
            Op::Print => {
                let chain = self.get_mut(name)?;
                if chain.is_empty() {
                    println!("{}: (empty)", name);
                } else {
                    println!("{}: {}", name, chain);
                }
            }
            Op::Expect(expected) => {
                let actual = self.get_mut(name)?.to_vec();
                if &actual != expected {
                    bail!("Chain {} holds {:?}, expected {:?}", name, actual, expected);
                }
            }
            Op::ExpectSize(expected) => {
                let size = self.get_mut(name)?.size();
                if size != *expected {
                    bail!("Chain {} has size {}, expected {}", name, size, expected);
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&OrderedChain> {
        self.chains.get(name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut OrderedChain> {
        self.chains
            .get_mut(name)
            .ok_or(anyhow!("Unknown chain {}", name))
    }

    fn swap(&mut self, a: &str, b: &str) -> Result<()> {
        if a == b {
            self.get_mut(a)?;
            return Ok(());
        }
        // take one chain out so both can be borrowed mutably
        let mut first = self
            .chains
            .remove(a)
            .ok_or(anyhow!("Unknown chain {}", a))?;
        let swapped = self.get_mut(b).map(|second| first.swap(second));
        self.chains.insert(a.to_string(), first);
        swapped
    }
}
