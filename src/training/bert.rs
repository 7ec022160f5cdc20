//! BERT encoder assembled from differentiable tensor ops for fine-tuning
//!
//! The fused layer-norm and softmax kernels used at inference time have no
//! backward pass, so this encoder spells both out. Parameter names follow the
//! Hugging Face checkpoint layout, so weights saved from the `VarMap` load back
//! into the inference encoder unchanged.

use crate::error::{Result, ResumeCheckerError};
use crate::processing::embeddings::SentenceEncoder;
use crate::processing::sentence_bert::{load_tokenizer, mean_pool, required_file, tokenize, CONFIG_FILE, WEIGHTS_FILE};
use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{embedding, linear, ops, Embedding, Init, Linear, VarBuilder, VarMap};
use log::info;
use serde::Deserialize;
use std::path::Path;
use tokenizers::Tokenizer;

/// Texts per forward pass when scoring validation pairs
const EVAL_BATCH_SIZE: usize = 32;
/// Added to attention scores of padding positions
const MASKED_SCORE: f64 = -10_000.0;

/// The subset of `config.json` needed to build the encoder
#[derive(Debug, Clone, Deserialize)]
pub struct BertDims {
    pub vocab_size: usize,
    pub hidden_size: usize,
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
    pub intermediate_size: usize,
    pub max_position_embeddings: usize,
    #[serde(default = "default_type_vocab_size")]
    pub type_vocab_size: usize,
    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
    #[serde(default = "default_hidden_act")]
    pub hidden_act: String,
}

fn default_type_vocab_size() -> usize {
    2
}

fn default_layer_norm_eps() -> f64 {
    1e-12
}

fn default_hidden_act() -> String {
    "gelu".to_string()
}

#[derive(Debug, Clone, Copy)]
enum Activation {
    GeluErf,
    GeluTanh,
    Relu,
}

impl Activation {
    fn from_name(name: &str) -> Result<Self> {
        match name {
            "gelu" => Ok(Activation::GeluErf),
            "gelu_new" | "gelu_pytorch_tanh" => Ok(Activation::GeluTanh),
            "relu" => Ok(Activation::Relu),
            other => Err(ResumeCheckerError::ModelLoading(format!("Unsupported hidden_act '{}'", other))),
        }
    }

    fn apply(self, xs: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Activation::GeluErf => xs.gelu_erf(),
            Activation::GeluTanh => xs.gelu(),
            Activation::Relu => xs.relu(),
        }
    }
}

struct LayerNorm {
    weight: Tensor,
    bias: Tensor,
    eps: f64,
}

impl LayerNorm {
    fn new(size: usize, eps: f64, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            weight: vb.get_with_hints(size, "weight", Init::Const(1.0))?,
            bias: vb.get_with_hints(size, "bias", Init::Const(0.0))?,
            eps,
        })
    }

    /// `(x - mean) / sqrt(var + eps) * weight + bias` over the last dimension
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mean = xs.mean_keepdim(D::Minus1)?;
        let centered = xs.broadcast_sub(&mean)?;
        let variance = centered.sqr()?.mean_keepdim(D::Minus1)?;
        let normed = centered.broadcast_div(&variance.affine(1.0, self.eps)?.sqrt()?)?;
        normed.broadcast_mul(&self.weight)?.broadcast_add(&self.bias)
    }
}

struct Embeddings {
    word: Embedding,
    position: Embedding,
    token_type: Embedding,
    layer_norm: LayerNorm,
}

impl Embeddings {
    fn new(dims: &BertDims, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            word: embedding(dims.vocab_size, dims.hidden_size, vb.pp("word_embeddings"))?,
            position: embedding(dims.max_position_embeddings, dims.hidden_size, vb.pp("position_embeddings"))?,
            token_type: embedding(dims.type_vocab_size, dims.hidden_size, vb.pp("token_type_embeddings"))?,
            layer_norm: LayerNorm::new(dims.hidden_size, dims.layer_norm_eps, vb.pp("LayerNorm"))?,
        })
    }

    fn forward(&self, input_ids: &Tensor) -> candle_core::Result<Tensor> {
        let (_, seq_len) = input_ids.dims2()?;
        let positions = Tensor::arange(0u32, seq_len as u32, input_ids.device())?.unsqueeze(0)?;
        let token_types = input_ids.zeros_like()?;

        let xs = self
            .word
            .forward(input_ids)?
            .broadcast_add(&self.position.forward(&positions)?)?
            .add(&self.token_type.forward(&token_types)?)?;
        self.layer_norm.forward(&xs)
    }
}

struct Attention {
    query: Linear,
    key: Linear,
    value: Linear,
    output: Linear,
    layer_norm: LayerNorm,
    num_heads: usize,
    head_dim: usize,
}

impl Attention {
    fn new(dims: &BertDims, vb: VarBuilder) -> candle_core::Result<Self> {
        let hidden = dims.hidden_size;
        let self_vb = vb.pp("self");
        let output_vb = vb.pp("output");
        Ok(Self {
            query: linear(hidden, hidden, self_vb.pp("query"))?,
            key: linear(hidden, hidden, self_vb.pp("key"))?,
            value: linear(hidden, hidden, self_vb.pp("value"))?,
            output: linear(hidden, hidden, output_vb.pp("dense"))?,
            layer_norm: LayerNorm::new(hidden, dims.layer_norm_eps, output_vb.pp("LayerNorm"))?,
            num_heads: dims.num_attention_heads,
            head_dim: hidden / dims.num_attention_heads,
        })
    }

    fn split_heads(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let (batch, seq_len, _) = xs.dims3()?;
        xs.reshape((batch, seq_len, self.num_heads, self.head_dim))?
            .transpose(1, 2)?
            .contiguous()
    }

    /// `mask_bias` is `[batch, 1, 1, seq]`: 0 for tokens, a large negative value for padding
    fn forward(&self, xs: &Tensor, mask_bias: &Tensor) -> candle_core::Result<Tensor> {
        let (batch, seq_len, hidden) = xs.dims3()?;
        let q = self.split_heads(&self.query.forward(xs)?)?;
        let k = self.split_heads(&self.key.forward(xs)?)?;
        let v = self.split_heads(&self.value.forward(xs)?)?;

        let scale = 1.0 / (self.head_dim as f64).sqrt();
        let scores = q.matmul(&k.t()?.contiguous()?)?.affine(scale, 0.0)?.broadcast_add(mask_bias)?;
        let probs = ops::softmax(&scores, D::Minus1)?;

        let context = probs
            .matmul(&v)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((batch, seq_len, hidden))?;
        let projected = self.output.forward(&context)?;
        self.layer_norm.forward(&(projected + xs)?)
    }
}

struct EncoderLayer {
    attention: Attention,
    intermediate: Linear,
    output: Linear,
    layer_norm: LayerNorm,
    activation: Activation,
}

impl EncoderLayer {
    fn new(dims: &BertDims, activation: Activation, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            attention: Attention::new(dims, vb.pp("attention"))?,
            intermediate: linear(dims.hidden_size, dims.intermediate_size, vb.pp("intermediate").pp("dense"))?,
            output: linear(dims.intermediate_size, dims.hidden_size, vb.pp("output").pp("dense"))?,
            layer_norm: LayerNorm::new(dims.hidden_size, dims.layer_norm_eps, vb.pp("output").pp("LayerNorm"))?,
            activation,
        })
    }

    fn forward(&self, xs: &Tensor, mask_bias: &Tensor) -> candle_core::Result<Tensor> {
        let attended = self.attention.forward(xs, mask_bias)?;
        let expanded = self.activation.apply(&self.intermediate.forward(&attended)?)?;
        let projected = self.output.forward(&expanded)?;
        self.layer_norm.forward(&(projected + attended)?)
    }
}

/// BERT body whose every parameter receives a gradient
pub struct TrainableBert {
    embeddings: Embeddings,
    layers: Vec<EncoderLayer>,
}

impl TrainableBert {
    pub fn new(vb: VarBuilder, dims: &BertDims) -> Result<Self> {
        if dims.num_attention_heads == 0 || dims.hidden_size % dims.num_attention_heads != 0 {
            return Err(ResumeCheckerError::ModelLoading(format!(
                "hidden_size {} is not divisible by {} attention heads",
                dims.hidden_size, dims.num_attention_heads
            )));
        }
        let activation = Activation::from_name(&dims.hidden_act)?;

        let embeddings = Embeddings::new(dims, vb.pp("embeddings"))?;
        let layers = (0..dims.num_hidden_layers)
            .map(|i| EncoderLayer::new(dims, activation, vb.pp("encoder").pp("layer").pp(i)))
            .collect::<candle_core::Result<Vec<_>>>()?;

        Ok(Self { embeddings, layers })
    }

    /// Token states `[batch, seq, hidden]` for `input_ids` and `attention_mask`, both `[batch, seq]`
    pub fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let (batch, seq_len) = attention_mask.dims2()?;
        let mask_bias = attention_mask
            .to_dtype(DType::F32)?
            .affine(-MASKED_SCORE, MASKED_SCORE)?
            .reshape((batch, 1, 1, seq_len))?;

        let mut xs = self.embeddings.forward(input_ids)?;
        for layer in &self.layers {
            xs = layer.forward(&xs, &mask_bias)?;
        }
        Ok(xs)
    }
}

/// Tokenizer plus trainable BERT with mean pooling
pub struct FineTuneEncoder {
    model: TrainableBert,
    tokenizer: Tokenizer,
    device: Device,
    name: String,
}

impl FineTuneEncoder {
    /// Load a checkpoint into a fresh `VarMap` whose variables the optimizer can update
    pub fn load(model_dir: &Path, device: &Device, max_seq_length: usize) -> Result<(Self, VarMap)> {
        let dims = read_dims(model_dir)?;
        let tokenizer = load_tokenizer(model_dir, max_seq_length)?;
        let weights = required_file(model_dir, WEIGHTS_FILE)?;

        let mut varmap = VarMap::new();
        let model = TrainableBert::new(VarBuilder::from_varmap(&varmap, DType::F32, device), &dims)?;
        varmap.load(&weights)?;
        info!(
            "Loaded {} trainable tensors from {}",
            varmap.all_vars().len(),
            model_dir.display()
        );

        let encoder = Self {
            model,
            tokenizer,
            device: device.clone(),
            name: model_dir.display().to_string(),
        };
        Ok((encoder, varmap))
    }

    /// Mean-pooled embeddings `[texts.len(), hidden]`, kept on the autograd graph
    pub fn embed(&self, texts: &[String]) -> Result<Tensor> {
        let (input_ids, attention_mask) = tokenize(&self.tokenizer, texts, &self.device)?;
        let hidden = self.model.forward(&input_ids, &attention_mask)?;
        mean_pool(&hidden, &attention_mask)
    }
}

impl SentenceEncoder for FineTuneEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EVAL_BATCH_SIZE) {
            embeddings.extend(self.embed(batch)?.detach().to_vec2::<f32>()?);
        }
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn read_dims(model_dir: &Path) -> Result<BertDims> {
    let content = std::fs::read_to_string(required_file(model_dir, CONFIG_FILE)?)?;
    serde_json::from_str(&content)
        .map_err(|e| ResumeCheckerError::ModelLoading(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
}
